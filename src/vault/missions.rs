//! Timed missions - templates and in-flight instances

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, MissionId};
use crate::vault::agent::SkillKind;
use crate::vault::resources::ResourceBundle;

/// A mission template offered on the logistics board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    pub description: String,
    pub difficulty: u32,
    pub required_skill: SkillKind,
    /// Ticks until the team returns
    pub duration: u64,
    pub rewards: ResourceBundle,
}

/// A dispatched mission counting down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveMission {
    pub mission_id: MissionId,
    pub name: String,
    pub remaining_ticks: u64,
    pub team: Vec<AgentId>,
    pub rewards: ResourceBundle,
}

impl ActiveMission {
    pub fn dispatch(mission: &Mission, team: Vec<AgentId>) -> Self {
        Self {
            mission_id: mission.id,
            name: mission.name.clone(),
            remaining_ticks: mission.duration,
            team,
            rewards: mission.rewards.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_ticks == 0
    }
}

/// Count every active mission down by `ticks`, removing and returning the
/// ones that reached zero, in dispatch order.
pub fn tick_missions(active: &mut Vec<ActiveMission>, ticks: u64) -> Vec<ActiveMission> {
    for mission in active.iter_mut() {
        mission.remaining_ticks = mission.remaining_ticks.saturating_sub(ticks);
    }

    let (done, pending): (Vec<_>, Vec<_>) =
        std::mem::take(active).into_iter().partition(|m| m.is_complete());
    *active = pending;
    done
}
