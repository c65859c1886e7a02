use thiserror::Error;

use crate::core::types::{AgentId, MissionId, RoomId, SlotId, TerritoryId};

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Action rejected: {0}")]
    Action(#[from] ActionError),

    #[error("Narrative error: {0}")]
    Narrative(#[from] NarrativeError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A transition produced an outcome its action cannot yield
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

/// A state transition whose preconditions do not hold.
///
/// Rejected actions leave the game state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("tick count must be at least 1")]
    ZeroTicks,

    #[error("advancing {ticks} ticks from tick {tick} overflows the clock")]
    ClockOverflow { tick: u64, ticks: u64 },

    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("mission not found: {0}")]
    MissionNotFound(MissionId),

    #[error("territory not found: {0}")]
    TerritoryNotFound(TerritoryId),

    #[error("hydroponics slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("team is empty")]
    EmptyTeam,

    #[error("agent {0} is listed twice in the team")]
    DuplicateAgent(AgentId),

    #[error("agent {0} is already deployed")]
    AgentBusy(AgentId),

    #[error("agent {0} is incapacitated")]
    AgentIncapacitated(AgentId),

    #[error("mission {0} is already in progress")]
    MissionAlreadyActive(MissionId),

    #[error("an assault is already active")]
    AssaultAlreadyActive,

    #[error("no active assault")]
    NoActiveAssault,

    #[error("assault has concluded and must be dismissed")]
    AssaultConcluded,

    #[error("territory {0} is already held by the player")]
    TerritoryAlreadyHeld(TerritoryId),

    #[error("no briefing available for territory {0}")]
    NoBriefing(TerritoryId),

    #[error("slot {0} is already planted")]
    SlotOccupied(SlotId),

    #[error("{crop} cannot be planted during {season}")]
    OutOfSeason { crop: String, season: String },

    #[error("slot {0} has nothing ready to harvest")]
    NotReadyToHarvest(SlotId),
}

/// Failure talking to, or understanding, the narrative collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NarrativeError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("no JSON object found in response")]
    NoJson,

    #[error("malformed briefing: {0}")]
    Malformed(String),

    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("narrative call timed out after {0} ms")]
    Timeout(u64),

    #[error("narrator not configured: {0}")]
    NotConfigured(String),
}
