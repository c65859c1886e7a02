//! Vault layer - resources, rooms, agents, hydroponics and missions

pub mod agent;
pub mod challenge;
pub mod events;
pub mod hydroponics;
pub mod missions;
pub mod production;
pub mod resources;
pub mod room;

pub use agent::{Agent, Assignment, LevelUp, SkillKind, Skills};
pub use challenge::{Challenge, ChallengeKind};
pub use events::{EventLog, LogCategory, LogEntry};
pub use hydroponics::{CropType, HydroSlot};
pub use missions::{ActiveMission, Mission};
pub use production::{apply_base_drain, tick_production, ProductionResult};
pub use resources::{ResourceBundle, ResourceKind, Resources};
pub use room::{Room, RoomType};
