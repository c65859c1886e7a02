//! Vault challenges - long-running goals fed by production and harvests

use serde::{Deserialize, Serialize};

use crate::core::types::ChallengeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// Progress is units of power produced by rooms
    ProducePower,
    /// Progress is crops harvested
    HarvestCrops,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub requirement: String,
    pub kind: ChallengeKind,
    pub progress: f64,
    pub goal: f64,
    pub completed: bool,
}

impl Challenge {
    /// Add progress; returns true on the call that completes the challenge
    pub fn record(&mut self, amount: f64) -> bool {
        if self.completed {
            return false;
        }
        self.progress = (self.progress + amount).min(self.goal);
        if self.progress >= self.goal {
            self.completed = true;
            return true;
        }
        false
    }
}

/// Feed progress to every open challenge of `kind`.
///
/// Returns the titles of challenges completed by this update.
pub fn record_progress(challenges: &mut [Challenge], kind: ChallengeKind, amount: f64) -> Vec<String> {
    if amount <= 0.0 {
        return Vec::new();
    }
    challenges
        .iter_mut()
        .filter(|c| c.kind == kind)
        .filter_map(|c| c.record(amount).then(|| c.title.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power_surge() -> Challenge {
        Challenge {
            id: ChallengeId(1),
            title: "Power Surge".into(),
            requirement: "Produce 500 Power".into(),
            kind: ChallengeKind::ProducePower,
            progress: 100.0,
            goal: 500.0,
            completed: false,
        }
    }

    #[test]
    fn test_completes_once() {
        let mut challenges = vec![power_surge()];
        assert!(record_progress(&mut challenges, ChallengeKind::ProducePower, 300.0).is_empty());
        let done = record_progress(&mut challenges, ChallengeKind::ProducePower, 150.0);
        assert_eq!(done, vec!["Power Surge".to_string()]);
        assert_eq!(challenges[0].progress, 500.0);
        assert!(record_progress(&mut challenges, ChallengeKind::ProducePower, 10.0).is_empty());
    }

    #[test]
    fn test_other_kinds_untouched() {
        let mut challenges = vec![power_surge()];
        record_progress(&mut challenges, ChallengeKind::HarvestCrops, 1.0);
        assert_eq!(challenges[0].progress, 100.0);
    }
}
