//! Assault resolution for the campaign layer
//!
//! An assault is a three-wave engagement against a territory. Each wave is
//! resolved with one roll against a success chance derived from the team's
//! combat skill and the briefing difficulty:
//!
//! ```text
//! READY --resolve--> IN_PROGRESS --resolve--> ... --> SUCCESS | FAILED
//! ```
//!
//! A cleared wave advances the wave counter; a setback damages the team and
//! repeats the same wave unless the team was wiped or forced to withdraw.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::campaign::territory::Territory;
use crate::core::config::AssaultConfig;
use crate::core::error::NarrativeError;
use crate::core::types::{AgentId, Faction, TerritoryId};
use crate::vault::agent::Agent;
use crate::vault::resources::ResourceKind;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;
pub const MIN_STABILITY_IMPACT: f64 = 5.0;
pub const MAX_STABILITY_IMPACT: f64 = 25.0;

/// The spoils a briefing promises on capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    Intel,
    Parts,
    Caps,
    Reputation,
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RewardType::Intel => "INTEL",
            RewardType::Parts => "PARTS",
            RewardType::Caps => "CAPS",
            RewardType::Reputation => "REPUTATION",
        };
        f.write_str(name)
    }
}

/// Tactical briefing for a target, as supplied by the narrative collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Briefing {
    pub title: String,
    pub description: String,
    pub enemy_type: String,
    /// 1 to 10
    pub difficulty: f64,
    pub reward_estimate: String,
    /// Stability removed from the target per cleared wave, 5 to 25
    pub stability_impact: f64,
    pub unique_reward_type: RewardType,
}

impl Briefing {
    /// Range-check the numeric fields
    pub fn validate(&self) -> Result<(), NarrativeError> {
        if self.title.trim().is_empty() {
            return Err(NarrativeError::Malformed("title is empty".into()));
        }
        if self.enemy_type.trim().is_empty() {
            return Err(NarrativeError::Malformed("enemyType is empty".into()));
        }
        if !self.difficulty.is_finite()
            || !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty)
        {
            return Err(NarrativeError::OutOfRange {
                field: "difficulty",
                value: self.difficulty,
            });
        }
        if !self.stability_impact.is_finite()
            || !(MIN_STABILITY_IMPACT..=MAX_STABILITY_IMPACT).contains(&self.stability_impact)
        {
            return Err(NarrativeError::OutOfRange {
                field: "stabilityImpact",
                value: self.stability_impact,
            });
        }
        Ok(())
    }

    /// Reward multiplier applied on capture
    pub fn reward_multiplier(&self) -> f64 {
        1.0 + self.difficulty / 10.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssaultStatus {
    Ready,
    InProgress,
    Success,
    Failed,
}

impl AssaultStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssaultStatus::Success | AssaultStatus::Failed)
    }
}

/// The single active engagement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssaultState {
    pub territory_id: TerritoryId,
    pub territory_name: String,
    pub faction: Faction,
    pub briefing: Briefing,
    /// 1-based wave being fought
    pub current_wave: u32,
    /// Narrative for every resolved wave, in order
    pub wave_logs: Vec<String>,
    /// Fixed at dispatch
    pub team: Vec<AgentId>,
    pub status: AssaultStatus,
}

impl AssaultState {
    pub fn new(territory: &Territory, briefing: Briefing, team: Vec<AgentId>) -> Self {
        Self {
            territory_id: territory.id,
            territory_name: territory.name.clone(),
            faction: territory.owner,
            briefing,
            current_wave: 1,
            wave_logs: Vec::new(),
            team,
            status: AssaultStatus::Ready,
        }
    }

    pub fn is_concluded(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Reward credited when the final wave is cleared
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssaultReward {
    Resource(ResourceKind, f64),
    Reputation(u32),
}

/// Outcome of a single wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveOutcome {
    /// Wave cleared, next wave queued
    Cleared,
    /// Final wave cleared; territory taken
    Captured(AssaultReward),
    /// Team took damage; the same wave will be fought again
    Setback,
    /// Every team member is down
    Wiped,
    /// Heavy fire forced the team out
    Withdrawn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveReport {
    pub wave: u32,
    pub success_chance: f64,
    pub roll: f64,
    pub outcome: WaveOutcome,
}

/// Average combat skill of the team members still standing, over the
/// fixed team size.
pub fn average_combat(team: &[AgentId], agents: &[Agent]) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    let total: u32 = agents
        .iter()
        .filter(|a| team.contains(&a.id) && !a.is_incapacitated())
        .map(|a| a.skills.combat)
        .sum();
    total as f64 / team.len() as f64
}

/// Chance of clearing the current wave.
///
/// `base + (avg_combat - difficulty * 10) / 100`, unclamped unless configured.
pub fn success_chance(assault: &AssaultState, agents: &[Agent], config: &AssaultConfig) -> f64 {
    let difficulty_factor = assault.briefing.difficulty * 10.0;
    let performance_bonus = (average_combat(&assault.team, agents) - difficulty_factor) / 100.0;
    let chance = config.base_success_chance + performance_bonus;
    if config.clamp_success_chance {
        chance.clamp(0.0, 1.0)
    } else {
        chance
    }
}

/// Reward for capturing with this briefing
pub fn capture_reward(briefing: &Briefing, config: &AssaultConfig) -> AssaultReward {
    let mult = briefing.reward_multiplier();
    match briefing.unique_reward_type {
        RewardType::Caps => AssaultReward::Resource(ResourceKind::Caps, (config.caps_reward * mult).floor()),
        RewardType::Parts => {
            AssaultReward::Resource(ResourceKind::Parts, (config.parts_reward * mult).floor())
        }
        RewardType::Intel => {
            AssaultReward::Resource(ResourceKind::Intel, (config.intel_reward * mult).floor())
        }
        RewardType::Reputation => {
            AssaultReward::Reputation((config.reputation_reward * mult).floor() as u32)
        }
    }
}

/// Resolve the current wave.
///
/// The caller must have checked the assault is not concluded. Appends the
/// narrative, rolls once, and applies XP, karma, energy, damage and
/// territory changes. Resource rewards are returned in the outcome for the
/// caller to credit.
pub fn resolve_wave(
    assault: &mut AssaultState,
    agents: &mut [Agent],
    territory: &mut Territory,
    player: Faction,
    narrative: String,
    config: &AssaultConfig,
    rng: &mut impl Rng,
) -> WaveReport {
    debug_assert!(!assault.is_concluded());

    let wave = assault.current_wave;
    assault.status = AssaultStatus::InProgress;
    assault.wave_logs.push(narrative);

    let chance = success_chance(assault, agents, config);
    let roll: f64 = rng.gen();

    let outcome = if roll < chance {
        let karma = if roll < config.decisive_roll {
            config.decisive_karma
        } else {
            config.standard_karma
        };
        for agent in agents.iter_mut().filter(|a| assault.team.contains(&a.id)) {
            agent.xp += rng.gen_range(config.wave_xp_min..=config.wave_xp_max);
            agent.gain_karma(karma);
            agent.spend_energy(config.wave_energy_cost);
        }
        territory.erode(assault.briefing.stability_impact);

        if wave >= config.waves {
            assault.status = AssaultStatus::Success;
            territory.capture(player, config.captured_stability);
            WaveOutcome::Captured(capture_reward(&assault.briefing, config))
        } else {
            assault.current_wave += 1;
            WaveOutcome::Cleared
        }
    } else {
        for agent in agents.iter_mut().filter(|a| assault.team.contains(&a.id)) {
            agent.damage(rng.gen_range(config.damage_min..config.damage_max));
            agent.lose_karma(config.setback_karma_loss);
        }

        // A team member missing from the roster counts as down
        let wiped = assault.team.iter().all(|id| {
            agents
                .iter()
                .find(|a| a.id == *id)
                .map_or(true, |a| a.is_incapacitated())
        });

        let withdrawal_roll = if config.independent_withdrawal_roll {
            rng.gen::<f64>()
        } else {
            roll
        };

        if wiped {
            assault.status = AssaultStatus::Failed;
            WaveOutcome::Wiped
        } else if withdrawal_roll < config.withdrawal_threshold {
            assault.status = AssaultStatus::Failed;
            WaveOutcome::Withdrawn
        } else {
            WaveOutcome::Setback
        }
    };

    tracing::debug!(wave, chance, roll, ?outcome, "assault wave resolved");

    WaveReport {
        wave,
        success_chance: chance,
        roll,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::agent::Skills;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn briefing(difficulty: f64, reward: RewardType) -> Briefing {
        Briefing {
            title: "Securitron Sweep".into(),
            description: "Mk II patrols on the strip.".into(),
            enemy_type: "Securitron Mk II Patrol".into(),
            difficulty,
            reward_estimate: "A cache of caps".into(),
            stability_impact: 10.0,
            unique_reward_type: reward,
        }
    }

    fn setup(combat: u32, difficulty: f64) -> (AssaultState, Vec<Agent>, Territory) {
        let territory = Territory::new(TerritoryId(4), "Oildale Frontier", 0.4, Faction::House);
        let agent = Agent::new(AgentId(3), "Merc-X", Skills::new(5, 30, combat, 10, 20));
        let assault = AssaultState::new(
            &territory,
            briefing(difficulty, RewardType::Caps),
            vec![agent.id],
        );
        (assault, vec![agent], territory)
    }

    #[test]
    fn test_briefing_validation() {
        assert!(briefing(5.0, RewardType::Intel).validate().is_ok());
        assert!(matches!(
            briefing(11.0, RewardType::Intel).validate(),
            Err(NarrativeError::OutOfRange { field: "difficulty", .. })
        ));
        let mut b = briefing(5.0, RewardType::Intel);
        b.stability_impact = 2.0;
        assert!(b.validate().is_err());
        b.stability_impact = f64::NAN;
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_success_chance_formula() {
        let (assault, agents, _) = setup(95, 3.0);
        let chance = success_chance(&assault, &agents, &AssaultConfig::default());
        assert!((chance - 1.25).abs() < 1e-9);

        let config = AssaultConfig {
            clamp_success_chance: true,
            ..Default::default()
        };
        assert_eq!(success_chance(&assault, &agents, &config), 1.0);
    }

    #[test]
    fn test_downed_members_count_as_zero() {
        let mut agents = vec![
            Agent::new(AgentId(1), "A", Skills::new(0, 0, 80, 0, 0)),
            Agent::new(AgentId(2), "B", Skills::new(0, 0, 40, 0, 0)),
        ];
        agents[1].hp = 0.0;
        let avg = average_combat(&[AgentId(1), AgentId(2)], &agents);
        assert!((avg - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_wave_capture() {
        let (mut assault, mut agents, mut territory) = setup(95, 3.0);
        let config = AssaultConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for wave in 1..=3 {
            let report = resolve_wave(
                &mut assault,
                &mut agents,
                &mut territory,
                Faction::Ncr,
                format!("Wave {} narrative", wave),
                &config,
                &mut rng,
            );
            assert_eq!(report.wave, wave);
            if wave < 3 {
                assert_eq!(report.outcome, WaveOutcome::Cleared);
                assert_eq!(assault.status, AssaultStatus::InProgress);
            } else {
                assert_eq!(
                    report.outcome,
                    WaveOutcome::Captured(AssaultReward::Resource(ResourceKind::Caps, 260.0))
                );
            }
        }

        assert_eq!(assault.status, AssaultStatus::Success);
        assert_eq!(assault.wave_logs.len(), 3);
        assert_eq!(territory.owner, Faction::Ncr);
        assert_eq!(territory.stability, 50.0);
        assert!(agents[0].xp >= 45 && agents[0].xp <= 72);
        assert_eq!(agents[0].energy, 70.0);
    }

    #[test]
    fn test_wipe_on_first_setback() {
        let (mut assault, mut agents, mut territory) = setup(0, 10.0);
        agents[0].hp = 20.0;
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let report = resolve_wave(
            &mut assault,
            &mut agents,
            &mut territory,
            Faction::Ncr,
            "Crossfire".into(),
            &AssaultConfig::default(),
            &mut rng,
        );

        assert_eq!(report.outcome, WaveOutcome::Wiped);
        assert_eq!(assault.status, AssaultStatus::Failed);
        assert_eq!(agents[0].hp, 0.0);
        assert_eq!(territory.owner, Faction::House);
        assert_eq!(territory.stability, 50.0);
    }

    #[test]
    fn test_withdrawal_reuses_wave_roll() {
        // Every draw is zero: roll 0.0 < 0.1, damage exactly 20
        let (mut assault, mut agents, mut territory) = setup(0, 10.0);
        let mut rng = StepRng::new(0, 0);

        let report = resolve_wave(
            &mut assault,
            &mut agents,
            &mut territory,
            Faction::Ncr,
            "Pinned down".into(),
            &AssaultConfig::default(),
            &mut rng,
        );

        assert_eq!(report.roll, 0.0);
        assert_eq!(report.outcome, WaveOutcome::Withdrawn);
        assert_eq!(agents[0].hp, 80.0);
        assert_eq!(agents[0].karma, 49);
    }

    #[test]
    fn test_independent_withdrawal_roll() {
        // Draws: 0.0 (wave roll), ~0.5 (damage), ~1.0 (withdrawal roll)
        let (mut assault, mut agents, mut territory) = setup(0, 10.0);
        let mut rng = StepRng::new(0, u64::MAX / 2);
        let config = AssaultConfig {
            independent_withdrawal_roll: true,
            ..Default::default()
        };

        let report = resolve_wave(
            &mut assault,
            &mut agents,
            &mut territory,
            Faction::Ncr,
            "Pinned down".into(),
            &config,
            &mut rng,
        );

        assert_eq!(report.outcome, WaveOutcome::Setback);
        assert_eq!(assault.status, AssaultStatus::InProgress);
        assert_eq!(assault.current_wave, 1);
    }

    #[test]
    fn test_low_roll_earns_decisive_karma() {
        let config = AssaultConfig::default();
        // roll 0.0 is under the decisive line
        let (mut assault, mut agents, mut territory) = setup(95, 3.0);
        let report = resolve_wave(
            &mut assault,
            &mut agents,
            &mut territory,
            Faction::Ncr,
            "Clean sweep".into(),
            &config,
            &mut StepRng::new(0, 0),
        );
        assert_eq!(report.outcome, WaveOutcome::Cleared);
        assert_eq!(agents[0].karma, 50 + config.decisive_karma);

        // roll 0.5 clears the wave without the bonus
        let (mut assault, mut agents, mut territory) = setup(95, 3.0);
        let report = resolve_wave(
            &mut assault,
            &mut agents,
            &mut territory,
            Faction::Ncr,
            "Hard going".into(),
            &config,
            &mut StepRng::new(1 << 63, 0),
        );
        assert_eq!(report.roll, 0.5);
        assert_eq!(report.outcome, WaveOutcome::Cleared);
        assert_eq!(agents[0].karma, 50 + config.standard_karma);
        assert!(agents[0].xp >= config.wave_xp_min && agents[0].xp <= config.wave_xp_max);
    }

    #[test]
    fn test_capture_rewards_by_type() {
        let config = AssaultConfig::default();
        assert_eq!(
            capture_reward(&briefing(3.0, RewardType::Parts), &config),
            AssaultReward::Resource(ResourceKind::Parts, 19.0)
        );
        assert_eq!(
            capture_reward(&briefing(3.0, RewardType::Intel), &config),
            AssaultReward::Resource(ResourceKind::Intel, 13.0)
        );
        assert_eq!(
            capture_reward(&briefing(3.0, RewardType::Reputation), &config),
            AssaultReward::Reputation(6)
        );
    }
}
