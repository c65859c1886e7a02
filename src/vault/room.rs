//! Vault rooms - type, level, integrity and staff

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::ProductionConfig;
use crate::core::types::{AgentId, RoomId};
use crate::vault::agent::SkillKind;
use crate::vault::resources::{ResourceBundle, ResourceKind};

pub const MAX_INTEGRITY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Power,
    Hydro,
    Network,
    Maintenance,
    Medbay,
}

/// How a room type turns staff skill into output
#[derive(Debug, Clone, PartialEq)]
pub struct RoomProfile {
    /// Skill that drives staffing efficiency
    pub skill: SkillKind,
    /// Resource produced and its per-tick base rate
    pub output: Option<(ResourceKind, f64)>,
    /// Resources consumed per tick while producing
    pub inputs: ResourceBundle,
}

impl RoomType {
    pub fn profile(&self, config: &ProductionConfig) -> RoomProfile {
        match self {
            RoomType::Power => RoomProfile {
                skill: SkillKind::Mining,
                output: Some((ResourceKind::Power, config.power_rate)),
                inputs: vec![],
            },
            RoomType::Hydro => RoomProfile {
                skill: SkillKind::Farming,
                output: Some((ResourceKind::Food, config.hydro_food_rate)),
                inputs: vec![
                    (ResourceKind::Water, config.hydro_water_input),
                    (ResourceKind::Power, config.hydro_power_input),
                ],
            },
            RoomType::Network => RoomProfile {
                skill: SkillKind::Intel,
                output: Some((ResourceKind::Intel, config.network_intel_rate)),
                inputs: vec![],
            },
            RoomType::Medbay => RoomProfile {
                skill: SkillKind::Tech,
                output: Some((ResourceKind::Meds, config.medbay_meds_rate)),
                inputs: vec![],
            },
            RoomType::Maintenance => RoomProfile {
                skill: SkillKind::Tech,
                output: None,
                inputs: vec![],
            },
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoomType::Power => "POWER",
            RoomType::Hydro => "HYDRO",
            RoomType::Network => "NETWORK",
            RoomType::Maintenance => "MAINTENANCE",
            RoomType::Medbay => "MEDBAY",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_type: RoomType,
    pub level: u32,
    /// 0 to 100
    pub integrity: f64,
    /// Agents whose assignment is `Room(self.id)`
    pub staff: Vec<AgentId>,
}

impl Room {
    pub fn new(id: RoomId, room_type: RoomType) -> Self {
        Self {
            id,
            room_type,
            level: 1,
            integrity: MAX_INTEGRITY,
            staff: Vec::new(),
        }
    }

    pub fn is_operable(&self, config: &ProductionConfig) -> bool {
        self.integrity > config.operable_integrity
    }

    pub fn decay(&mut self, amount: f64) {
        self.integrity = (self.integrity - amount).max(0.0);
    }

    pub fn repair(&mut self, amount: f64) {
        self.integrity = (self.integrity + amount).min(MAX_INTEGRITY);
    }

    pub fn add_staff(&mut self, agent: AgentId) {
        if !self.staff.contains(&agent) {
            self.staff.push(agent);
        }
    }

    pub fn remove_staff(&mut self, agent: AgentId) {
        self.staff.retain(|id| *id != agent);
    }
}
