pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, DayChange};
pub use config::SimulationConfig;
pub use error::{ActionError, NarrativeError, Result, VaultError};
