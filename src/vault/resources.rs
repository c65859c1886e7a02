//! Resource ledger - the vault's seven scalar stores

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of resource the vault stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Power,
    Water,
    Food,
    Meds,
    Parts,
    Intel,
    Caps,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Power,
        ResourceKind::Water,
        ResourceKind::Food,
        ResourceKind::Meds,
        ResourceKind::Parts,
        ResourceKind::Intel,
        ResourceKind::Caps,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Power => "power",
            ResourceKind::Water => "water",
            ResourceKind::Food => "food",
            ResourceKind::Meds => "meds",
            ResourceKind::Parts => "parts",
            ResourceKind::Intel => "intel",
            ResourceKind::Caps => "caps",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of resource amounts, used for rewards, yields and recipe inputs
pub type ResourceBundle = Vec<(ResourceKind, f64)>;

/// Vault resource ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub power: f64,
    pub water: f64,
    pub food: f64,
    pub meds: f64,
    pub parts: f64,
    pub intel: f64,
    pub caps: f64,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current amount of a resource
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Power => self.power,
            ResourceKind::Water => self.water,
            ResourceKind::Food => self.food,
            ResourceKind::Meds => self.meds,
            ResourceKind::Parts => self.parts,
            ResourceKind::Intel => self.intel,
            ResourceKind::Caps => self.caps,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Power => &mut self.power,
            ResourceKind::Water => &mut self.water,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Meds => &mut self.meds,
            ResourceKind::Parts => &mut self.parts,
            ResourceKind::Intel => &mut self.intel,
            ResourceKind::Caps => &mut self.caps,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: f64) {
        *self.slot_mut(kind) += amount;
    }

    /// Remove up to `amount`, never going below zero. Returns amount removed.
    pub fn drain(&mut self, kind: ResourceKind, amount: f64) -> f64 {
        let slot = self.slot_mut(kind);
        let removed = amount.min(*slot).max(0.0);
        *slot -= removed;
        removed
    }

    /// Check if the ledger covers every requirement
    pub fn has_materials(&self, requirements: &[(ResourceKind, f64)]) -> bool {
        requirements
            .iter()
            .all(|(kind, amount)| self.get(*kind) >= *amount)
    }

    /// Consume all requirements, or nothing if any is short
    pub fn consume_materials(&mut self, requirements: &[(ResourceKind, f64)]) -> bool {
        if !self.has_materials(requirements) {
            return false;
        }
        for (kind, amount) in requirements {
            *self.slot_mut(*kind) -= amount;
        }
        true
    }

    pub fn add_bundle(&mut self, bundle: &[(ResourceKind, f64)]) {
        for (kind, amount) in bundle {
            self.add(*kind, *amount);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        ResourceKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_drain() {
        let mut res = Resources::new();
        res.add(ResourceKind::Water, 10.0);
        assert_eq!(res.get(ResourceKind::Water), 10.0);

        assert_eq!(res.drain(ResourceKind::Water, 4.0), 4.0);
        assert_eq!(res.water, 6.0);

        // Drain floors at zero
        assert_eq!(res.drain(ResourceKind::Water, 100.0), 6.0);
        assert_eq!(res.water, 0.0);
    }

    #[test]
    fn test_consume_is_all_or_nothing() {
        let mut res = Resources {
            water: 5.0,
            power: 1.0,
            ..Default::default()
        };

        let needs = vec![(ResourceKind::Water, 2.0), (ResourceKind::Power, 2.0)];
        assert!(!res.consume_materials(&needs));
        assert_eq!(res.water, 5.0);
        assert_eq!(res.power, 1.0);

        let fits = vec![(ResourceKind::Water, 2.0), (ResourceKind::Power, 1.0)];
        assert!(res.consume_materials(&fits));
        assert_eq!(res.water, 3.0);
        assert_eq!(res.power, 0.0);
    }

    #[test]
    fn test_bundle_and_iter_cover_all_kinds() {
        let mut res = Resources::new();
        res.add_bundle(&[(ResourceKind::Parts, 10.0), (ResourceKind::Intel, 5.0)]);
        assert_eq!(res.parts, 10.0);
        assert_eq!(res.intel, 5.0);
        assert_eq!(res.iter().count(), 7);
    }
}
