//! Map territories held by the wasteland factions

use serde::{Deserialize, Serialize};

use crate::core::types::{Faction, TerritoryId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    /// 0 to 1; static flavor that drives passive stability decay
    pub hostility: f64,
    pub owner: Faction,
    /// 0 to 100
    pub stability: f64,
    pub revenue: f64,
}

impl Territory {
    pub fn new(id: TerritoryId, name: impl Into<String>, hostility: f64, owner: Faction) -> Self {
        Self {
            id,
            name: name.into(),
            hostility: hostility.clamp(0.0, 1.0),
            owner,
            stability: 50.0,
            revenue: 0.0,
        }
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = revenue;
        self
    }

    /// Daily decay of `hostility * factor`, never below `floor`.
    ///
    /// A territory already at or under the floor is left alone.
    pub fn decay_stability(&mut self, factor: f64, floor: f64) {
        if self.stability <= floor {
            return;
        }
        self.stability = (self.stability - self.hostility * factor).max(floor);
    }

    /// Stability lost to a cleared assault wave, floored at 0
    pub fn erode(&mut self, impact: f64) {
        self.stability = (self.stability - impact).max(0.0);
    }

    pub fn capture(&mut self, faction: Faction, stability: f64) {
        self.owner = faction;
        self.stability = stability;
    }
}
