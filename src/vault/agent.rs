//! Vault agents - vitals, skills, leveling and assignment

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::RosterConfig;
use crate::core::types::{AgentId, MissionId, RoomId, TerritoryId};

/// The five trainable skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Farming,
    Mining,
    Combat,
    Intel,
    Tech,
}

impl SkillKind {
    pub const ALL: [SkillKind; 5] = [
        SkillKind::Farming,
        SkillKind::Mining,
        SkillKind::Combat,
        SkillKind::Intel,
        SkillKind::Tech,
    ];
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillKind::Farming => "farming",
            SkillKind::Mining => "mining",
            SkillKind::Combat => "combat",
            SkillKind::Intel => "intel",
            SkillKind::Tech => "tech",
        };
        f.write_str(name)
    }
}

/// Skill vector; values grow without bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub farming: u32,
    pub mining: u32,
    pub combat: u32,
    pub intel: u32,
    pub tech: u32,
}

impl Skills {
    pub fn new(farming: u32, mining: u32, combat: u32, intel: u32, tech: u32) -> Self {
        Self {
            farming,
            mining,
            combat,
            intel,
            tech,
        }
    }

    pub fn get(&self, kind: SkillKind) -> u32 {
        match kind {
            SkillKind::Farming => self.farming,
            SkillKind::Mining => self.mining,
            SkillKind::Combat => self.combat,
            SkillKind::Intel => self.intel,
            SkillKind::Tech => self.tech,
        }
    }

    pub fn get_mut(&mut self, kind: SkillKind) -> &mut u32 {
        match kind {
            SkillKind::Farming => &mut self.farming,
            SkillKind::Mining => &mut self.mining,
            SkillKind::Combat => &mut self.combat,
            SkillKind::Intel => &mut self.intel,
            SkillKind::Tech => &mut self.tech,
        }
    }
}

/// What an agent is currently doing. Exactly one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assignment {
    #[default]
    Idle,
    Room(RoomId),
    Mission(MissionId),
    Combat(TerritoryId),
}

impl Assignment {
    pub fn is_idle(&self) -> bool {
        matches!(self, Assignment::Idle)
    }

    /// Deployed away from the vault (mission or combat)
    pub fn is_deployed(&self) -> bool {
        matches!(self, Assignment::Mission(_) | Assignment::Combat(_))
    }

    pub fn room(&self) -> Option<RoomId> {
        match self {
            Assignment::Room(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Idle => f.write_str("standby"),
            Assignment::Room(id) => write!(f, "room {}", id),
            Assignment::Mission(id) => write!(f, "mission {}", id),
            Assignment::Combat(id) => write!(f, "assault on {}", id),
        }
    }
}

/// A vault dweller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub hp: f64,
    pub max_hp: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub xp: u32,
    pub level: u32,
    /// Cosmetic tags with no mechanical effect
    pub traits: Vec<String>,
    /// 0 to 100
    pub karma: u32,
    pub skills: Skills,
    pub assignment: Assignment,
}

/// Record of a level gained
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub agent: AgentId,
    pub new_level: u32,
    pub gains: Skills,
}

pub const MAX_KARMA: u32 = 100;

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, skills: Skills) -> Self {
        Self {
            id,
            name: name.into(),
            hp: 100.0,
            max_hp: 100.0,
            energy: 100.0,
            max_energy: 100.0,
            xp: 0,
            level: 1,
            traits: Vec::new(),
            karma: 50,
            skills,
            assignment: Assignment::Idle,
        }
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_karma(mut self, karma: u32) -> Self {
        self.karma = karma.min(MAX_KARMA);
        self
    }

    /// Zero hp is not death; the agent simply stays inert
    pub fn is_incapacitated(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn heal(&mut self, amount: f64) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn damage(&mut self, amount: f64) {
        self.hp = (self.hp - amount).max(0.0);
    }

    pub fn restore_energy(&mut self, amount: f64) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }

    pub fn spend_energy(&mut self, amount: f64) {
        self.energy = (self.energy - amount).max(0.0);
    }

    pub fn gain_karma(&mut self, amount: u32) {
        self.karma = (self.karma + amount).min(MAX_KARMA);
    }

    pub fn lose_karma(&mut self, amount: u32) {
        self.karma = self.karma.saturating_sub(amount);
    }

    /// XP needed for the next level
    pub fn xp_threshold(&self, config: &RosterConfig) -> u32 {
        self.level * config.xp_per_level
    }

    /// Level up once if the XP threshold is met.
    ///
    /// At most one level per call, even if XP would cover several.
    pub fn try_level_up(&mut self, config: &RosterConfig, rng: &mut impl Rng) -> Option<LevelUp> {
        if self.xp < self.xp_threshold(config) {
            return None;
        }

        self.level += 1;
        self.xp = 0;

        let mut gains = Skills::default();
        for kind in SkillKind::ALL {
            let gain = rng.gen_range(config.skill_gain_min..=config.skill_gain_max);
            *gains.get_mut(kind) = gain;
            *self.skills.get_mut(kind) += gain;
        }

        Some(LevelUp {
            agent: self.id,
            new_level: self.level,
            gains,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_agent() -> Agent {
        Agent::new(AgentId(1), "Ronin-7", Skills::new(10, 85, 85, 40, 50))
    }

    #[test]
    fn test_vitals_clamp() {
        let mut agent = test_agent();
        agent.damage(150.0);
        assert_eq!(agent.hp, 0.0);
        assert!(agent.is_incapacitated());

        agent.heal(500.0);
        assert_eq!(agent.hp, agent.max_hp);

        agent.spend_energy(30.0);
        assert_eq!(agent.energy, 70.0);
        agent.restore_energy(80.0);
        assert_eq!(agent.energy, 100.0);
    }

    #[test]
    fn test_karma_bounds() {
        let mut agent = test_agent().with_karma(99);
        agent.gain_karma(5);
        assert_eq!(agent.karma, 100);
        agent.karma = 0;
        agent.lose_karma(1);
        assert_eq!(agent.karma, 0);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let mut agent = test_agent();
        agent.xp = 99;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(agent.try_level_up(&RosterConfig::default(), &mut rng).is_none());
        assert_eq!(agent.level, 1);
        assert_eq!(agent.xp, 99);
    }

    #[test]
    fn test_level_up_at_threshold() {
        let mut agent = test_agent();
        let before = agent.skills;
        agent.xp = 100;
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let level_up = agent
            .try_level_up(&RosterConfig::default(), &mut rng)
            .expect("should level");
        assert_eq!(level_up.new_level, 2);
        assert_eq!(agent.level, 2);
        assert_eq!(agent.xp, 0);

        for kind in SkillKind::ALL {
            let gain = agent.skills.get(kind) - before.get(kind);
            assert!((2..=6).contains(&gain), "{} gained {}", kind, gain);
            assert_eq!(level_up.gains.get(kind), gain);
        }
    }

    #[test]
    fn test_only_one_level_per_call() {
        let mut agent = test_agent();
        agent.xp = 1000;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        agent.try_level_up(&RosterConfig::default(), &mut rng);
        assert_eq!(agent.level, 2);
        assert_eq!(agent.xp, 0);
    }
}
