//! Campaign layer - territories and the assault state machine

pub mod assault;
pub mod territory;

pub use assault::{
    capture_reward, resolve_wave, success_chance, AssaultReward, AssaultState, AssaultStatus,
    Briefing, RewardType, WaveOutcome, WaveReport,
};
pub use territory::Territory;
