//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section can be overridden
//! from a TOML file; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, VaultError};

/// Configuration for the vault simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the deterministic RNG driving leveling and combat rolls
    pub seed: u64,
    pub production: ProductionConfig,
    pub cycle: CycleConfig,
    pub roster: RosterConfig,
    pub assault: AssaultConfig,
    pub narrative: NarrativeConfig,
}

/// Room production, drains and wear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    // === DRAINS ===
    /// Power consumed by vault life support every tick, staffed or not
    pub power_drain: f64,
    pub water_drain: f64,
    pub food_drain: f64,

    // === WEAR ===
    /// Integrity a room loses every tick
    ///
    /// At 0.05 a fresh room reaches the operability threshold after
    /// 1800 ticks (18 days) without maintenance.
    pub integrity_decay: f64,

    /// Rooms at or below this integrity do not produce
    pub operable_integrity: f64,

    // === OUTPUT (per tick, at efficiency 1.0 and level 1) ===
    pub power_rate: f64,
    pub hydro_food_rate: f64,
    pub network_intel_rate: f64,
    pub medbay_meds_rate: f64,

    // === HYDRO INPUTS (per tick) ===
    /// Water a staffed hydroponics bay needs per tick
    pub hydro_water_input: f64,
    /// Power a staffed hydroponics bay needs per tick
    pub hydro_power_input: f64,

    // === SIDE EFFECTS (per tick) ===
    /// HP restored to each medbay staff member
    pub heal_rate: f64,
    /// Integrity restored to the most worn room by a maintenance crew
    pub repair_rate: f64,
}

/// Day boundary effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    pub ticks_per_day: u64,
    pub days_per_season: u64,
    /// Energy restored to every conscious agent at dawn
    pub daily_energy: f64,
    /// HP restored to every conscious agent at dawn
    pub daily_heal: f64,
    /// Daily stability loss is hostility times this factor
    pub stability_decay_factor: f64,
    /// Passive decay never pushes stability below this floor
    pub stability_floor: f64,
}

/// Leveling and mission rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// XP needed per level; an agent levels at `level * xp_per_level`
    pub xp_per_level: u32,
    /// Inclusive range of the per-skill gain on level up
    pub skill_gain_min: u32,
    pub skill_gain_max: u32,
    /// Flat XP granted to each member of a completed mission
    pub mission_xp: u32,
}

/// Assault wave resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssaultConfig {
    /// Waves needed to capture a territory
    pub waves: u32,
    /// Chance of clearing a wave when team skill equals difficulty x 10
    pub base_success_chance: f64,
    /// Clamp the success chance to [0, 1]
    ///
    /// Off by default: outclassed teams always fail and dominant teams
    /// always win, which is the established game balance.
    pub clamp_success_chance: bool,
    /// Draw a fresh roll for the forced-withdrawal check
    ///
    /// Off by default: the withdrawal check reuses the wave roll, so a
    /// setback below `withdrawal_threshold` is impossible unless the
    /// success chance was also below it.
    pub independent_withdrawal_roll: bool,
    /// Inclusive XP range granted per member on a cleared wave
    pub wave_xp_min: u32,
    pub wave_xp_max: u32,
    /// Rolls below this earn the larger karma bonus
    pub decisive_roll: f64,
    pub decisive_karma: u32,
    pub standard_karma: u32,
    pub wave_energy_cost: f64,
    /// Half-open damage range [min, max) applied per member on a setback
    pub damage_min: f64,
    pub damage_max: f64,
    pub setback_karma_loss: u32,
    /// Setback rolls below this force a withdrawal
    pub withdrawal_threshold: f64,
    /// Stability of a freshly captured territory
    pub captured_stability: f64,
    pub caps_reward: f64,
    pub parts_reward: f64,
    pub intel_reward: f64,
    pub reputation_reward: f64,
}

/// Narrative collaborator calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Upper bound on a single collaborator call
    pub timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            production: ProductionConfig::default(),
            cycle: CycleConfig::default(),
            roster: RosterConfig::default(),
            assault: AssaultConfig::default(),
            narrative: NarrativeConfig::default(),
        }
    }
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            power_drain: 0.1,
            water_drain: 0.05,
            food_drain: 0.05,
            integrity_decay: 0.05,
            operable_integrity: 10.0,
            power_rate: 2.0,
            hydro_food_rate: 1.0,
            network_intel_rate: 0.5,
            medbay_meds_rate: 0.2,
            hydro_water_input: 0.5,
            hydro_power_input: 0.25,
            heal_rate: 0.5,
            repair_rate: 0.2,
        }
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 100,
            days_per_season: 28,
            daily_energy: 20.0,
            daily_heal: 5.0,
            stability_decay_factor: 3.0,
            stability_floor: 10.0,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 100,
            skill_gain_min: 2,
            skill_gain_max: 6,
            mission_xp: 20,
        }
    }
}

impl Default for AssaultConfig {
    fn default() -> Self {
        Self {
            waves: 3,
            base_success_chance: 0.6,
            clamp_success_chance: false,
            independent_withdrawal_roll: false,
            wave_xp_min: 15,
            wave_xp_max: 24,
            decisive_roll: 0.2,
            decisive_karma: 5,
            standard_karma: 2,
            wave_energy_cost: 10.0,
            damage_min: 20.0,
            damage_max: 50.0,
            setback_karma_loss: 1,
            withdrawal_threshold: 0.1,
            captured_stability: 50.0,
            caps_reward: 200.0,
            parts_reward: 15.0,
            intel_reward: 10.0,
            reputation_reward: 5.0,
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.cycle.ticks_per_day == 0 || self.cycle.days_per_season == 0 {
            return Err("ticks_per_day and days_per_season must be positive".into());
        }

        if self.roster.skill_gain_min > self.roster.skill_gain_max {
            return Err(format!(
                "skill_gain_min ({}) should be <= skill_gain_max ({})",
                self.roster.skill_gain_min, self.roster.skill_gain_max
            ));
        }

        if self.roster.xp_per_level == 0 {
            return Err("xp_per_level must be positive".into());
        }

        if self.assault.waves == 0 {
            return Err("an assault needs at least one wave".into());
        }

        if self.assault.wave_xp_min > self.assault.wave_xp_max {
            return Err(format!(
                "wave_xp_min ({}) should be <= wave_xp_max ({})",
                self.assault.wave_xp_min, self.assault.wave_xp_max
            ));
        }

        // gen_range panics on an empty half-open range
        if self.assault.damage_min >= self.assault.damage_max {
            return Err(format!(
                "damage_min ({}) should be < damage_max ({})",
                self.assault.damage_min, self.assault.damage_max
            ));
        }

        let p = &self.production;
        let rates = [
            p.power_drain,
            p.water_drain,
            p.food_drain,
            p.integrity_decay,
            p.power_rate,
            p.hydro_food_rate,
            p.network_intel_rate,
            p.medbay_meds_rate,
            p.hydro_water_input,
            p.hydro_power_input,
            p.heal_rate,
            p.repair_rate,
        ];
        if rates.iter().any(|r| *r < 0.0 || !r.is_finite()) {
            return Err("production rates must be finite and non-negative".into());
        }

        Ok(())
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| VaultError::Config(e.to_string()))?;
        config.validate().map_err(VaultError::Config)?;
        Ok(config)
    }
}
