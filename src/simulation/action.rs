//! Actions - every way the player can change the game
//!
//! [`apply`] is copy-on-write: it validates the action against the current
//! state, then works on a clone. A rejected action returns an
//! [`ActionError`] and the input state is never touched.

use rand::Rng;

use crate::campaign::assault::{resolve_wave, AssaultReward, AssaultState, Briefing, WaveOutcome, WaveReport};
use crate::core::config::SimulationConfig;
use crate::core::error::ActionError;
use crate::core::types::{AgentId, MissionId, RoomId, SlotId, TerritoryId};
use crate::simulation::state::{GameState, Vault};
use crate::simulation::tick::{advance, TickReport};
use crate::vault::agent::Assignment;
use crate::vault::challenge::{record_progress, ChallengeKind};
use crate::vault::events::LogCategory;
use crate::vault::hydroponics::CropType;
use crate::vault::missions::ActiveMission;
use crate::vault::resources::ResourceBundle;

/// Where an agent is being posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget {
    Room(RoomId),
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run the clock forward
    Advance { ticks: u64 },
    Assign { agent: AgentId, target: AssignTarget },
    DispatchMission { mission: MissionId, team: Vec<AgentId> },
    StartAssault {
        territory: TerritoryId,
        briefing: Briefing,
        team: Vec<AgentId>,
    },
    /// Resolve the current wave with narration already obtained
    ResolveWave { narrative: String },
    DismissAssault,
    Plant { slot: SlotId, crop: CropType },
    Harvest { slot: SlotId },
}

/// What an accepted action did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Advanced(TickReport),
    Assigned,
    MissionDispatched,
    AssaultStarted,
    Wave(WaveReport),
    AssaultDismissed,
    Planted,
    Harvested(ResourceBundle),
}

/// An accepted action: the next state and what happened
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub outcome: Outcome,
}

/// Apply `action` to `state`, returning the next state.
pub fn apply(
    state: &GameState,
    action: Action,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Result<Transition, ActionError> {
    check(state, &action)?;

    let mut next = state.clone();
    let outcome = match action {
        Action::Advance { ticks } => Outcome::Advanced(advance(&mut next, ticks, config, rng)),
        Action::Assign { agent, target } => {
            assign(&mut next.vault, agent, target);
            Outcome::Assigned
        }
        Action::DispatchMission { mission, team } => {
            dispatch_mission(&mut next.vault, mission, team);
            Outcome::MissionDispatched
        }
        Action::StartAssault {
            territory,
            briefing,
            team,
        } => {
            start_assault(&mut next, territory, briefing, team);
            Outcome::AssaultStarted
        }
        Action::ResolveWave { narrative } => Outcome::Wave(resolve(&mut next, narrative, config, rng)?),
        Action::DismissAssault => {
            dismiss(&mut next.vault);
            Outcome::AssaultDismissed
        }
        Action::Plant { slot, crop } => {
            if let Some(s) = next.vault.slot_mut(slot) {
                s.plant(crop);
            }
            next.vault
                .log(LogCategory::Hydro, format!("Planted {} in {}.", crop, slot));
            Outcome::Planted
        }
        Action::Harvest { slot } => Outcome::Harvested(harvest(&mut next.vault, slot)),
    };

    Ok(Transition {
        state: next,
        outcome,
    })
}

/// Validate `action` against `state` without changing anything
pub fn check(state: &GameState, action: &Action) -> Result<(), ActionError> {
    let vault = &state.vault;
    match action {
        Action::Advance { ticks } => {
            if *ticks == 0 {
                return Err(ActionError::ZeroTicks);
            }
            let tick = vault.tick();
            if tick.checked_add(*ticks).is_none() {
                return Err(ActionError::ClockOverflow { tick, ticks: *ticks });
            }
        }
        Action::Assign { agent, target } => {
            let found = vault.agent(*agent).ok_or(ActionError::AgentNotFound(*agent))?;
            if found.assignment.is_deployed() {
                return Err(ActionError::AgentBusy(*agent));
            }
            if let AssignTarget::Room(room) = target {
                vault.room(*room).ok_or(ActionError::RoomNotFound(*room))?;
            }
        }
        Action::DispatchMission { mission, team } => {
            vault.mission(*mission).ok_or(ActionError::MissionNotFound(*mission))?;
            if vault.active_missions.iter().any(|m| m.mission_id == *mission) {
                return Err(ActionError::MissionAlreadyActive(*mission));
            }
            check_team(vault, team, false)?;
        }
        Action::StartAssault {
            territory, team, ..
        } => {
            if vault.active_assault.is_some() {
                return Err(ActionError::AssaultAlreadyActive);
            }
            check_target(state, *territory)?;
            check_team(vault, team, true)?;
        }
        Action::ResolveWave { .. } => {
            check_resolvable(state)?;
        }
        Action::DismissAssault => {
            if vault.active_assault.is_none() {
                return Err(ActionError::NoActiveAssault);
            }
        }
        Action::Plant { slot, crop } => {
            let s = vault
                .hydroponics
                .iter()
                .find(|s| s.id == *slot)
                .ok_or(ActionError::SlotNotFound(*slot))?;
            if !s.is_empty() {
                return Err(ActionError::SlotOccupied(*slot));
            }
            if !crop.in_season(vault.season()) {
                return Err(ActionError::OutOfSeason {
                    crop: crop.to_string(),
                    season: vault.season().to_string(),
                });
            }
        }
        Action::Harvest { slot } => {
            let s = vault
                .hydroponics
                .iter()
                .find(|s| s.id == *slot)
                .ok_or(ActionError::SlotNotFound(*slot))?;
            if !s.is_ripe() {
                return Err(ActionError::NotReadyToHarvest(*slot));
            }
        }
    }
    Ok(())
}

/// The territory exists and is not already the player's
pub fn check_target(state: &GameState, territory: TerritoryId) -> Result<(), ActionError> {
    let target = state
        .territory(territory)
        .ok_or(ActionError::TerritoryNotFound(territory))?;
    if target.owner == state.player_faction {
        return Err(ActionError::TerritoryAlreadyHeld(territory));
    }
    Ok(())
}

/// The active assault, if it can still fight a wave
pub fn check_resolvable(state: &GameState) -> Result<&AssaultState, ActionError> {
    let assault = state
        .vault
        .active_assault
        .as_ref()
        .ok_or(ActionError::NoActiveAssault)?;
    if assault.is_concluded() {
        return Err(ActionError::AssaultConcluded);
    }
    Ok(assault)
}

fn check_team(vault: &Vault, team: &[AgentId], combat: bool) -> Result<(), ActionError> {
    if team.is_empty() {
        return Err(ActionError::EmptyTeam);
    }
    for (i, id) in team.iter().enumerate() {
        if team[..i].contains(id) {
            return Err(ActionError::DuplicateAgent(*id));
        }
        let agent = vault.agent(*id).ok_or(ActionError::AgentNotFound(*id))?;
        if agent.assignment.is_deployed() {
            return Err(ActionError::AgentBusy(*id));
        }
        if combat && agent.is_incapacitated() {
            return Err(ActionError::AgentIncapacitated(*id));
        }
    }
    Ok(())
}

fn assign(vault: &mut Vault, agent: AgentId, target: AssignTarget) {
    let assignment = match target {
        AssignTarget::Room(room) => Assignment::Room(room),
        AssignTarget::Idle => Assignment::Idle,
    };
    vault.set_assignment(agent, assignment);
    tracing::debug!(%agent, %assignment, "agent assigned");
}

fn dispatch_mission(vault: &mut Vault, mission: MissionId, team: Vec<AgentId>) {
    let Some(template) = vault.mission(mission).cloned() else {
        return;
    };
    for id in &team {
        vault.set_assignment(*id, Assignment::Mission(mission));
    }
    vault.log(
        LogCategory::Mission,
        format!("{} dispatched with {} agent(s).", template.name, team.len()),
    );
    tracing::info!(%mission, team = team.len(), "mission dispatched");
    vault.active_missions.push(ActiveMission::dispatch(&template, team));
}

fn start_assault(state: &mut GameState, territory: TerritoryId, briefing: Briefing, team: Vec<AgentId>) {
    let Some(target) = state.territory(territory) else {
        return;
    };
    let assault = AssaultState::new(target, briefing, team);
    let vault = &mut state.vault;
    for id in &assault.team {
        vault.set_assignment(*id, Assignment::Combat(territory));
    }
    vault.log(
        LogCategory::Combat,
        format!(
            "Assault on {} begins: {}.",
            assault.territory_name, assault.briefing.title
        ),
    );
    tracing::info!(%territory, team = assault.team.len(), "assault started");
    vault.active_assault = Some(assault);
}

fn resolve(
    state: &mut GameState,
    narrative: String,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Result<WaveReport, ActionError> {
    let player = state.player_faction;
    let GameState {
        territories, vault, reputation, ..
    } = state;

    let target = vault
        .active_assault
        .as_ref()
        .map(|a| a.territory_id)
        .ok_or(ActionError::NoActiveAssault)?;
    let territory = territories
        .iter_mut()
        .find(|t| t.id == target)
        .ok_or(ActionError::TerritoryNotFound(target))?;
    let assault = vault
        .active_assault
        .as_mut()
        .ok_or(ActionError::NoActiveAssault)?;

    let report = resolve_wave(
        assault,
        &mut vault.agents,
        territory,
        player,
        narrative,
        &config.assault,
        rng,
    );

    let name = assault.territory_name.clone();
    let message = match report.outcome {
        WaveOutcome::Cleared => format!("Wave {} cleared at {}.", report.wave, name),
        WaveOutcome::Captured(reward) => {
            match reward {
                AssaultReward::Resource(kind, amount) => vault.resources.add(kind, amount),
                AssaultReward::Reputation(amount) => *reputation += amount,
            }
            format!("{} secured for {}.", name, player)
        }
        WaveOutcome::Setback => format!("Wave {} repelled the squad at {}.", report.wave, name),
        WaveOutcome::Wiped => format!("Squad wiped out at {}.", name),
        WaveOutcome::Withdrawn => format!("Forced withdrawal from {}.", name),
    };
    vault.log(LogCategory::Combat, message);
    tracing::info!(wave = report.wave, outcome = ?report.outcome, "wave resolved");
    Ok(report)
}

fn dismiss(vault: &mut Vault) {
    let Some(assault) = vault.active_assault.take() else {
        return;
    };
    for id in &assault.team {
        vault.set_assignment(*id, Assignment::Idle);
    }
    vault.log(
        LogCategory::Combat,
        format!("Assault on {} closed ({:?}).", assault.territory_name, assault.status),
    );
}

fn harvest(vault: &mut Vault, slot: SlotId) -> ResourceBundle {
    let Some(s) = vault.slot_mut(slot) else {
        return Vec::new();
    };
    let crop = s.crop;
    let bundle = s.harvest();
    vault.resources.add_bundle(&bundle);
    vault.log(LogCategory::Hydro, format!("Harvested {} from {}.", crop, slot));
    for title in record_progress(&mut vault.challenges, ChallengeKind::HarvestCrops, 1.0) {
        vault.log(LogCategory::Challenge, format!("Challenge complete: {}.", title));
    }
    bundle
}
