//! Hydroponics - crop slots that grow once per in-game day

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{Season, SlotId};
use crate::vault::resources::{ResourceBundle, ResourceKind};

/// Full growth, in percent
pub const FULL_GROWTH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum CropType {
    StimWort,
    GlowGrain,
    IronStalk,
    Empty,
}

/// Static agronomy for a crop
#[derive(Debug, Clone, PartialEq)]
pub struct CropData {
    pub growth_days: u32,
    pub harvest_yield: ResourceBundle,
    pub seasons: &'static [Season],
}

impl CropType {
    /// Every plantable crop
    pub const ALL: [CropType; 3] = [CropType::StimWort, CropType::GlowGrain, CropType::IronStalk];

    pub fn data(&self) -> CropData {
        match self {
            CropType::StimWort => CropData {
                growth_days: 4,
                harvest_yield: vec![(ResourceKind::Meds, 5.0)],
                seasons: &[Season::RadBloom, Season::AshFall],
            },
            CropType::GlowGrain => CropData {
                growth_days: 6,
                harvest_yield: vec![(ResourceKind::Food, 20.0)],
                seasons: &[Season::SolarFlare],
            },
            CropType::IronStalk => CropData {
                growth_days: 8,
                harvest_yield: vec![(ResourceKind::Parts, 15.0)],
                seasons: &[Season::RadBloom, Season::SolarFlare, Season::AshFall],
            },
            CropType::Empty => CropData {
                growth_days: 0,
                harvest_yield: vec![],
                seasons: &[],
            },
        }
    }

    pub fn in_season(&self, season: Season) -> bool {
        self.data().seasons.contains(&season)
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CropType::StimWort => "STIM-WORT",
            CropType::GlowGrain => "GLOW-GRAIN",
            CropType::IronStalk => "IRON-STALK",
            CropType::Empty => "EMPTY",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for CropType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "STIM-WORT" => Ok(CropType::StimWort),
            "GLOW-GRAIN" => Ok(CropType::GlowGrain),
            "IRON-STALK" => Ok(CropType::IronStalk),
            other => Err(format!("unknown crop: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroSlot {
    pub id: SlotId,
    pub crop: CropType,
    /// 0 to 100
    pub growth: f64,
    pub days_remaining: u32,
}

impl HydroSlot {
    pub fn empty(id: SlotId) -> Self {
        Self {
            id,
            crop: CropType::Empty,
            growth: 0.0,
            days_remaining: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.crop == CropType::Empty
    }

    pub fn is_ripe(&self) -> bool {
        !self.is_empty() && self.growth >= FULL_GROWTH
    }

    pub fn plant(&mut self, crop: CropType) {
        self.crop = crop;
        self.growth = 0.0;
        self.days_remaining = crop.data().growth_days;
    }

    /// Advance one day of growth. Returns true if the slot changed.
    pub fn advance_day(&mut self) -> bool {
        if self.is_empty() || self.days_remaining == 0 {
            return false;
        }
        let total = self.crop.data().growth_days as f64;
        self.days_remaining -= 1;
        self.growth = ((total - self.days_remaining as f64) / total * 100.0).min(FULL_GROWTH);
        true
    }

    /// Empty the slot and return its yield
    pub fn harvest(&mut self) -> ResourceBundle {
        let harvest_yield = self.crop.data().harvest_yield;
        *self = Self::empty(self.id);
        harvest_yield
    }
}
