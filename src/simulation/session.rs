//! Session - owns the game, the RNG and the narrator
//!
//! Synchronous actions go straight through [`apply`]. Recon and wave
//! resolution first await the narrator (under a timeout); state changes only
//! once the narration is in hand, so a failed call leaves the game exactly
//! as it was.

use std::future::Future;
use std::time::Duration;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::campaign::assault::{Briefing, WaveReport};
use crate::core::config::SimulationConfig;
use crate::core::error::{ActionError, NarrativeError, Result, VaultError};
use crate::core::types::{AgentId, MissionId, SlotId, TerritoryId};
use crate::llm::narrator::Narrator;
use crate::simulation::action::{apply, check_resolvable, check_target, Action, AssignTarget, Outcome};
use crate::simulation::scenario::initial_state;
use crate::simulation::state::GameState;
use crate::simulation::tick::TickReport;
use crate::vault::events::LogCategory;
use crate::vault::hydroponics::CropType;
use crate::vault::resources::ResourceBundle;

pub struct Session<N: Narrator> {
    state: GameState,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    narrator: N,
    /// Last validated briefing per territory, consumed when an assault starts
    briefings: AHashMap<TerritoryId, Briefing>,
}

impl<N: Narrator> Session<N> {
    /// New game from the default scenario
    pub fn new(config: SimulationConfig, narrator: N) -> Result<Self> {
        let state = initial_state(&config);
        Self::with_state(state, config, narrator)
    }

    pub fn with_state(state: GameState, config: SimulationConfig, narrator: N) -> Result<Self> {
        config.validate().map_err(VaultError::Config)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            state,
            config,
            rng,
            narrator,
            briefings: AHashMap::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    pub fn briefing(&self, territory: TerritoryId) -> Option<&Briefing> {
        self.briefings.get(&territory)
    }

    fn run(&mut self, action: Action) -> Result<Outcome> {
        let transition = apply(&self.state, action, &self.config, &mut self.rng)?;
        self.state = transition.state;
        Ok(transition.outcome)
    }

    pub fn tick(&mut self, ticks: u64) -> Result<TickReport> {
        match self.run(Action::Advance { ticks })? {
            Outcome::Advanced(report) => Ok(report),
            other => Err(unexpected(other)),
        }
    }

    pub fn assign(&mut self, agent: AgentId, target: AssignTarget) -> Result<()> {
        self.run(Action::Assign { agent, target }).map(|_| ())
    }

    pub fn dispatch(&mut self, mission: MissionId, team: Vec<AgentId>) -> Result<()> {
        self.run(Action::DispatchMission { mission, team }).map(|_| ())
    }

    pub fn plant(&mut self, slot: SlotId, crop: CropType) -> Result<()> {
        self.run(Action::Plant { slot, crop }).map(|_| ())
    }

    pub fn harvest(&mut self, slot: SlotId) -> Result<ResourceBundle> {
        match self.run(Action::Harvest { slot })? {
            Outcome::Harvested(bundle) => Ok(bundle),
            other => Err(unexpected(other)),
        }
    }

    /// Ask the narrator for a briefing on `territory` and cache it
    pub async fn recon(&mut self, territory: TerritoryId) -> Result<Briefing> {
        check_target(&self.state, territory)?;
        let (name, faction) = match self.state.territory(territory) {
            Some(t) => (t.name.clone(), t.owner),
            None => return Err(ActionError::TerritoryNotFound(territory).into()),
        };

        let timeout_ms = self.config.narrative.timeout_ms;
        let briefing =
            with_timeout(timeout_ms, self.narrator.tactical_briefing(&name, faction)).await?;

        tracing::info!(%territory, difficulty = briefing.difficulty, "briefing received");
        self.state.vault.log(
            LogCategory::Combat,
            format!("Recon on {}: {} ({}).", name, briefing.title, briefing.enemy_type),
        );
        self.briefings.insert(territory, briefing.clone());
        Ok(briefing)
    }

    /// Start an assault using the cached briefing for `territory`
    pub fn start_assault(&mut self, territory: TerritoryId, team: Vec<AgentId>) -> Result<()> {
        let briefing = self
            .briefings
            .get(&territory)
            .cloned()
            .ok_or(ActionError::NoBriefing(territory))?;
        self.run(Action::StartAssault {
            territory,
            briefing,
            team,
        })?;
        self.briefings.remove(&territory);
        Ok(())
    }

    /// Narrate and resolve the current wave
    pub async fn resolve_wave(&mut self) -> Result<WaveReport> {
        let assault = check_resolvable(&self.state)?;
        let (briefing, wave, faction) = (assault.briefing.clone(), assault.current_wave, assault.faction);

        let timeout_ms = self.config.narrative.timeout_ms;
        let narrative =
            with_timeout(timeout_ms, self.narrator.combat_wave(&briefing, wave, faction)).await?;

        match self.run(Action::ResolveWave { narrative })? {
            Outcome::Wave(report) => Ok(report),
            other => Err(unexpected(other)),
        }
    }

    pub fn dismiss_assault(&mut self) -> Result<()> {
        self.run(Action::DismissAssault).map(|_| ())
    }

    /// Idle agents still standing, in roster order
    pub fn available_fighters(&self) -> Vec<AgentId> {
        self.state
            .vault
            .idle_agents()
            .filter(|a| !a.is_incapacitated())
            .map(|a| a.id)
            .collect()
    }
}

async fn with_timeout<T>(
    timeout_ms: u64,
    request: impl Future<Output = std::result::Result<T, NarrativeError>>,
) -> std::result::Result<T, NarrativeError> {
    match tokio::time::timeout(Duration::from_millis(timeout_ms), request).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms, "narrator timed out");
            Err(NarrativeError::Timeout(timeout_ms))
        }
    }
}

fn unexpected(outcome: Outcome) -> VaultError {
    VaultError::Internal(format!("unexpected outcome: {:?}", outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::narrator::ScriptedNarrator;

    fn session() -> Session<ScriptedNarrator> {
        Session::new(SimulationConfig::default(), ScriptedNarrator::new()).unwrap()
    }

    #[tokio::test]
    async fn test_assault_requires_recon() {
        let mut session = session();
        let err = session.start_assault(TerritoryId(2), vec![AgentId(3)]).unwrap_err();
        assert!(matches!(
            err,
            VaultError::Action(ActionError::NoBriefing(TerritoryId(2)))
        ));

        session.recon(TerritoryId(2)).await.unwrap();
        assert!(session.briefing(TerritoryId(2)).is_some());
        session.start_assault(TerritoryId(2), vec![AgentId(3)]).unwrap();
        assert!(session.briefing(TerritoryId(2)).is_none());
        assert!(session.state().vault.active_assault.is_some());
    }

    #[tokio::test]
    async fn test_recon_on_own_territory_skips_narrator() {
        let narrator = ScriptedNarrator::new();
        narrator.push_briefing("should stay queued");
        let mut session = Session::new(SimulationConfig::default(), narrator).unwrap();

        let err = session.recon(TerritoryId(1)).await.unwrap_err();
        assert!(matches!(
            err,
            VaultError::Action(ActionError::TerritoryAlreadyHeld(_))
        ));
        // The queued (unparseable) response is still there
        assert!(session.narrator().tactical_briefing("x", crate::core::types::Faction::Ncr).await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_without_assault() {
        let mut session = session();
        let err = session.resolve_wave().await.unwrap_err();
        assert!(matches!(err, VaultError::Action(ActionError::NoActiveAssault)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.cycle.ticks_per_day = 0;
        assert!(matches!(
            Session::new(config, ScriptedNarrator::new()),
            Err(VaultError::Config(_))
        ));
    }

    #[test]
    fn test_sync_actions() {
        let mut session = session();
        session.assign(AgentId(1), AssignTarget::Room(crate::core::types::RoomId(1))).unwrap();
        let report = session.tick(100).unwrap();
        assert!(report.day_change.is_some());
        assert_eq!(session.available_fighters(), vec![AgentId(2), AgentId(3)]);
    }
}
