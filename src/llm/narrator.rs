//! Narrative collaborator seam
//!
//! The simulation never calls an LLM directly. It asks a [`Narrator`] for
//! briefings and wave narration, so the game can run against a live model,
//! a scripted offline source, or a test double.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::campaign::assault::{Briefing, RewardType};
use crate::core::error::NarrativeError;
use crate::core::types::Faction;
use crate::llm::client::{CallProfile, LlmClient};
use crate::llm::context::{
    encounter_table, BriefingContext, WaveContext, BRIEFING_SYSTEM_PROMPT, WAVE_SYSTEM_PROMPT,
};
use crate::llm::parser::{parse_briefing, parse_wave_narrative};

/// Total waves an assault is narrated over
pub const TOTAL_WAVES: u32 = 3;

/// Source of briefings and combat narration
#[allow(async_fn_in_trait)]
pub trait Narrator {
    /// Tactical briefing for an assault on `territory`, validated
    async fn tactical_briefing(
        &self,
        territory: &str,
        faction: Faction,
    ) -> Result<Briefing, NarrativeError>;

    /// Flavor text for one wave
    async fn combat_wave(
        &self,
        briefing: &Briefing,
        wave: u32,
        faction: Faction,
    ) -> Result<String, NarrativeError>;
}

impl Narrator for LlmClient {
    async fn tactical_briefing(
        &self,
        territory: &str,
        faction: Faction,
    ) -> Result<Briefing, NarrativeError> {
        let ctx = BriefingContext {
            territory_name: territory,
            faction,
        };
        let response = self
            .complete(BRIEFING_SYSTEM_PROMPT, &ctx.user_prompt(), CallProfile::BRIEFING)
            .await?;
        parse_briefing(&response)
    }

    async fn combat_wave(
        &self,
        briefing: &Briefing,
        wave: u32,
        faction: Faction,
    ) -> Result<String, NarrativeError> {
        let ctx = WaveContext {
            briefing,
            wave,
            total_waves: TOTAL_WAVES,
            faction,
        };
        let response = self
            .complete(WAVE_SYSTEM_PROMPT, &ctx.user_prompt(), CallProfile::WAVE)
            .await?;
        parse_wave_narrative(&response)
    }
}

/// Offline narrator.
///
/// Queued responses are served first (raw briefing text goes through the
/// same parser as a live model); once a queue is empty, a deterministic
/// briefing or narration is generated from the faction's encounter table.
#[derive(Default)]
pub struct ScriptedNarrator {
    briefings: Mutex<VecDeque<Result<String, NarrativeError>>>,
    waves: Mutex<VecDeque<Result<String, NarrativeError>>>,
    delay: Option<Duration>,
}

impl ScriptedNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw briefing response
    pub fn push_briefing(&self, response: impl Into<String>) {
        lock(&self.briefings).push_back(Ok(response.into()));
    }

    /// Queue a raw wave narration response
    pub fn push_wave(&self, response: impl Into<String>) {
        lock(&self.waves).push_back(Ok(response.into()));
    }

    /// Queue a failure for the next briefing request
    pub fn push_briefing_error(&self, error: NarrativeError) {
        lock(&self.briefings).push_back(Err(error));
    }

    /// Queue a failure for the next wave request
    pub fn push_wave_error(&self, error: NarrativeError) {
        lock(&self.waves).push_back(Err(error));
    }

    /// Sleep before answering, to simulate a slow collaborator
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn default_briefing(territory: &str, faction: Faction) -> Briefing {
        let (difficulty, reward) = match faction {
            Faction::Ncr => (4.0, RewardType::Caps),
            Faction::Enclave => (8.0, RewardType::Intel),
            Faction::Brotherhood => (7.0, RewardType::Parts),
            Faction::House => (6.0, RewardType::Caps),
            Faction::Independent => (3.0, RewardType::Reputation),
        };
        let enemy = encounter_table(faction)
            .split('\'')
            .nth(1)
            .unwrap_or("Hostiles")
            .to_string();
        Briefing {
            title: format!("Operation {}", territory),
            description: format!("{} forces hold {}. Expect resistance.", faction, territory),
            enemy_type: enemy,
            difficulty,
            reward_estimate: format!("{} recovered from the site", reward),
            stability_impact: 10.0 + difficulty,
            unique_reward_type: reward,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Narrator for ScriptedNarrator {
    async fn tactical_briefing(
        &self,
        territory: &str,
        faction: Faction,
    ) -> Result<Briefing, NarrativeError> {
        self.pause().await;
        let queued = lock(&self.briefings).pop_front();
        match queued {
            Some(response) => parse_briefing(&response?),
            None => Ok(Self::default_briefing(territory, faction)),
        }
    }

    async fn combat_wave(
        &self,
        briefing: &Briefing,
        wave: u32,
        faction: Faction,
    ) -> Result<String, NarrativeError> {
        self.pause().await;
        let queued = lock(&self.waves).pop_front();
        match queued {
            Some(response) => parse_wave_narrative(&response?),
            None => Ok(format!(
                "Wave {}/{}: {} {} dig in as the squad advances.",
                wave, TOTAL_WAVES, faction, briefing.enemy_type
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_briefing_is_valid() {
        let narrator = ScriptedNarrator::new();
        for faction in Faction::ALL {
            let briefing = narrator
                .tactical_briefing("Kern River Outpost", faction)
                .await
                .unwrap();
            assert!(briefing.validate().is_ok(), "{:?}", faction);
        }
    }

    #[tokio::test]
    async fn test_default_enemy_comes_from_table() {
        let narrator = ScriptedNarrator::new();
        let briefing = narrator
            .tactical_briefing("Oildale Frontier", Faction::House)
            .await
            .unwrap();
        assert_eq!(briefing.enemy_type, "Securitron Mk II Patrol");
    }

    #[tokio::test]
    async fn test_queued_responses_are_parsed() {
        let narrator = ScriptedNarrator::new();
        narrator.push_briefing("not json at all");
        narrator.push_wave("   ");

        assert_eq!(
            narrator.tactical_briefing("X", Faction::Ncr).await,
            Err(NarrativeError::NoJson)
        );

        let briefing = narrator.tactical_briefing("X", Faction::Ncr).await.unwrap();
        assert_eq!(
            narrator.combat_wave(&briefing, 1, Faction::Ncr).await,
            Err(NarrativeError::EmptyResponse)
        );
        // Queue drained, falls back to generated text
        let text = narrator.combat_wave(&briefing, 1, Faction::Ncr).await.unwrap();
        assert!(text.starts_with("Wave 1/3"));
    }

    #[tokio::test]
    async fn test_queued_errors() {
        let narrator = ScriptedNarrator::new();
        narrator.push_wave_error(NarrativeError::Request("connection reset".into()));
        let briefing = narrator.tactical_briefing("X", Faction::Enclave).await.unwrap();
        assert!(matches!(
            narrator.combat_wave(&briefing, 1, Faction::Enclave).await,
            Err(NarrativeError::Request(_))
        ));
    }
}
