//! Tick system - advances the vault clock by a batch of ticks
//!
//! One batch runs, in order:
//! clock -> base drain -> room production -> missions -> day cycle -> leveling
//!
//! The day cycle fires at most once per batch, however many day
//! boundaries the batch crosses.

use rand::Rng;

use crate::core::calendar::DayChange;
use crate::core::config::SimulationConfig;
use crate::core::types::{AgentId, MissionId};
use crate::simulation::state::GameState;
use crate::vault::agent::{Assignment, LevelUp};
use crate::vault::challenge::{record_progress, ChallengeKind};
use crate::vault::events::LogCategory;
use crate::vault::missions::tick_missions;
use crate::vault::production::{apply_base_drain, tick_production, ProductionResult};
use crate::vault::resources::ResourceKind;

/// What happened during one tick batch
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub ticks: u64,
    pub production: Vec<ProductionResult>,
    pub completed_missions: Vec<MissionId>,
    pub day_change: Option<DayChange>,
    /// Slots whose crop finished growing during the day cycle
    pub ripened: usize,
    pub level_ups: Vec<LevelUp>,
    pub completed_challenges: Vec<String>,
}

/// Advance the game by `ticks`. The caller has already checked `ticks >= 1`.
pub fn advance(
    state: &mut GameState,
    ticks: u64,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> TickReport {
    let day_change = state.vault.calendar.advance(ticks);

    let vault = &mut state.vault;
    apply_base_drain(&mut vault.resources, &config.production, ticks);

    let production = tick_production(
        &mut vault.rooms,
        &mut vault.agents,
        &mut vault.resources,
        &config.production,
        ticks,
    );
    let power_produced: f64 = production
        .iter()
        .filter_map(|r| r.produced)
        .filter(|(kind, _)| *kind == ResourceKind::Power)
        .map(|(_, amount)| amount)
        .sum();
    let mut completed_challenges = Vec::new();
    if power_produced > 0.0 {
        completed_challenges.extend(record_progress(
            &mut vault.challenges,
            ChallengeKind::ProducePower,
            power_produced,
        ));
    }

    let completed_missions = complete_missions(state, ticks, config);

    let mut ripened = 0;
    if let Some(change) = day_change {
        ripened = run_daily_cycle(state, change, config);
    }

    let level_ups = level_agents(state, config, rng);

    for title in &completed_challenges {
        state
            .vault
            .log(LogCategory::Challenge, format!("Challenge complete: {}.", title));
    }

    tracing::debug!(
        ticks,
        tick = state.vault.tick(),
        rooms_produced = production.len(),
        missions = completed_missions.len(),
        "tick batch processed"
    );

    TickReport {
        ticks,
        production,
        completed_missions,
        day_change,
        ripened,
        level_ups,
        completed_challenges,
    }
}

/// Count missions down, paying out and freeing the team of each that returns
fn complete_missions(state: &mut GameState, ticks: u64, config: &SimulationConfig) -> Vec<MissionId> {
    let vault = &mut state.vault;
    let done = tick_missions(&mut vault.active_missions, ticks);
    let mut completed = Vec::with_capacity(done.len());

    for mission in done {
        vault.resources.add_bundle(&mission.rewards);
        for id in &mission.team {
            vault.set_assignment(*id, Assignment::Idle);
            if let Some(agent) = vault.agent_mut(*id) {
                agent.xp += config.roster.mission_xp;
            }
        }
        vault.log(
            LogCategory::Mission,
            format!("{} completed successfully.", mission.name),
        );
        tracing::info!(mission = %mission.mission_id, "mission completed");
        completed.push(mission.mission_id);
    }

    completed
}

/// Daily effects: rest, crop growth, territory decay and the season turn.
///
/// Returns the number of slots that ripened.
fn run_daily_cycle(state: &mut GameState, change: DayChange, config: &SimulationConfig) -> usize {
    let cycle = &config.cycle;

    for agent in state.vault.agents.iter_mut().filter(|a| !a.is_incapacitated()) {
        agent.restore_energy(cycle.daily_energy);
        agent.heal(cycle.daily_heal);
    }

    let mut ripe_slots = Vec::new();
    for slot in state.vault.hydroponics.iter_mut() {
        if slot.advance_day() && slot.is_ripe() {
            ripe_slots.push((slot.id, slot.crop));
        }
    }

    for territory in state.territories.iter_mut() {
        territory.decay_stability(cycle.stability_decay_factor, cycle.stability_floor);
    }

    let vault = &mut state.vault;
    vault.log(LogCategory::Day, "Synchronizing Strand data.");
    for (slot, crop) in &ripe_slots {
        vault.log(LogCategory::Hydro, format!("{} in {} is ready for harvest.", crop, slot));
    }
    if let Some(season) = change.new_season {
        vault.log(LogCategory::Season, format!("Environmental shift: {}.", season));
        tracing::info!(%season, day = change.day, "season changed");
    }
    tracing::info!(day = change.day, previous = change.previous_day, "new day");

    ripe_slots.len()
}

fn level_agents(state: &mut GameState, config: &SimulationConfig, rng: &mut impl Rng) -> Vec<LevelUp> {
    let vault = &mut state.vault;
    let level_ups: Vec<LevelUp> = vault
        .agents
        .iter_mut()
        .filter_map(|agent| agent.try_level_up(&config.roster, &mut *rng))
        .collect();

    for level_up in &level_ups {
        let name = agent_name(state, level_up.agent);
        state.vault.log(
            LogCategory::Roster,
            format!("{} reached level {}.", name, level_up.new_level),
        );
    }
    level_ups
}

fn agent_name(state: &GameState, id: AgentId) -> String {
    state
        .vault
        .agent(id)
        .map_or_else(|| id.to_string(), |a| a.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{RoomId, SlotId};
    use crate::simulation::scenario::initial_state;
    use crate::vault::hydroponics::CropType;
    use crate::vault::missions::ActiveMission;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (GameState, SimulationConfig, ChaCha8Rng) {
        let config = SimulationConfig::default();
        (initial_state(&config), config, ChaCha8Rng::seed_from_u64(42))
    }

    #[test]
    fn test_idle_vault_only_drains() {
        let (mut state, config, mut rng) = setup();
        let report = advance(&mut state, 10, &config, &mut rng);

        assert!(report.production.is_empty());
        assert!(report.day_change.is_none());
        let res = &state.vault.resources;
        assert!((res.power - 99.0).abs() < 1e-9);
        assert!((res.water - 99.5).abs() < 1e-9);
        assert!((res.food - 99.5).abs() < 1e-9);
        assert_eq!(res.parts, 20.0);
        for room in &state.vault.rooms {
            assert!((room.integrity - 99.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_power_counts_toward_challenge() {
        let (mut state, config, mut rng) = setup();
        state.vault.set_assignment(AgentId(1), Assignment::Room(RoomId(1)));

        advance(&mut state, 10, &config, &mut rng);

        // mining 85 -> efficiency 0.85 * 2.0 * 10 ticks
        let challenge = &state.vault.challenges[0];
        assert!((challenge.progress - 117.0).abs() < 1e-9);
    }

    #[test]
    fn test_day_cycle_fires_once() {
        let (mut state, config, mut rng) = setup();
        state.vault.agents[0].energy = 50.0;
        state.territories[0].stability = 50.0;

        let report = advance(&mut state, 250, &config, &mut rng);
        let change = report.day_change.unwrap();
        assert_eq!(change.previous_day, 1);
        assert_eq!(change.day, 3);
        assert_eq!(state.vault.agents[0].energy, 70.0);
        // hostility 0.7 * 3 once
        assert!((state.territories[0].stability - 47.9).abs() < 1e-9);
        assert_eq!(state.vault.event_log.entries_for(LogCategory::Day).count(), 1);
    }

    #[test]
    fn test_incapacitated_agents_do_not_rest() {
        let (mut state, config, mut rng) = setup();
        state.vault.agents[2].hp = 0.0;
        state.vault.agents[2].energy = 10.0;

        advance(&mut state, 100, &config, &mut rng);
        assert_eq!(state.vault.agents[2].hp, 0.0);
        assert_eq!(state.vault.agents[2].energy, 10.0);
    }

    #[test]
    fn test_season_turns_on_day_28() {
        let (mut state, config, mut rng) = setup();
        advance(&mut state, 27 * 100, &config, &mut rng);
        assert_eq!(state.vault.day(), 28);
        assert_eq!(state.vault.season(), crate::core::types::Season::SolarFlare);
        assert_eq!(state.vault.event_log.entries_for(LogCategory::Season).count(), 1);
    }

    #[test]
    fn test_mission_returns_team() {
        let (mut state, config, mut rng) = setup();
        let mission = state.vault.available_missions[0].clone();
        state.vault.active_missions.push(ActiveMission::dispatch(&mission, vec![AgentId(2)]));
        state.vault.set_assignment(AgentId(2), Assignment::Mission(mission.id));

        let report = advance(&mut state, mission.duration, &config, &mut rng);
        assert_eq!(report.completed_missions, vec![mission.id]);
        assert!(state.vault.active_missions.is_empty());
        let agent = state.vault.agent(AgentId(2)).unwrap();
        assert_eq!(agent.assignment, Assignment::Idle);
        assert_eq!(agent.xp, 20);
        assert_eq!(state.vault.resources.parts, 30.0);
        assert_eq!(state.vault.resources.intel, 5.0);
    }

    #[test]
    fn test_level_up_after_batch() {
        let (mut state, config, mut rng) = setup();
        state.vault.agents[0].xp = 100;
        let before = state.vault.agents[0].skills;

        let report = advance(&mut state, 1, &config, &mut rng);
        assert_eq!(report.level_ups.len(), 1);
        let agent = &state.vault.agents[0];
        assert_eq!(agent.level, 2);
        assert_eq!(agent.xp, 0);
        assert!(agent.skills.combat >= before.combat + 2);
        assert!(agent.skills.combat <= before.combat + 6);
    }

    #[test]
    fn test_crop_ripens_over_days() {
        let (mut state, config, mut rng) = setup();
        let crop = CropType::StimWort;
        state.vault.slot_mut(SlotId(1)).unwrap().plant(crop);

        let days = crop.data().growth_days as u64;
        let mut ripened = 0;
        for _ in 0..days {
            ripened += advance(&mut state, 100, &config, &mut rng).ripened;
        }
        assert_eq!(ripened, 1);
        assert!(state.vault.hydroponics[0].is_ripe());
    }
}
