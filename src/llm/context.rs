//! Build narrative prompts from game state
//!
//! Each faction has its own encounter table so briefings stay on theme;
//! the prompts only describe the situation, the response shape is fixed by
//! the system prompts.

use crate::campaign::assault::Briefing;
use crate::core::types::Faction;

/// Encounter themes the briefing writer should draw from
pub fn encounter_table(faction: Faction) -> &'static str {
    match faction {
        Faction::Ncr => {
            "'NCR Patrol Unit' or 'Settler Dispute'. Focus on bureaucracy and under-supplied rangers."
        }
        Faction::Enclave => {
            "'Robotic Security Checkpoint' or 'Radiation Anomaly'. Focus on high-tech terror."
        }
        Faction::Brotherhood => {
            "'Scribe Field Research' or 'Paladin Sentry'. Focus on tech-hoarding."
        }
        Faction::House => "'Securitron Mk II Patrol'. Focus on automated efficiency.",
        Faction::Independent => "'Raider Ambush' or 'Feral Swarm'.",
    }
}

/// Context for a tactical briefing request
pub struct BriefingContext<'a> {
    pub territory_name: &'a str,
    pub faction: Faction,
}

impl BriefingContext<'_> {
    pub fn user_prompt(&self) -> String {
        format!(
            "TARGET: {}\nHELD BY: {}\nENCOUNTER TABLE: {}\n\nReturn the SITREP as JSON:",
            self.territory_name,
            self.faction,
            encounter_table(self.faction)
        )
    }
}

/// Context for narrating a single assault wave
pub struct WaveContext<'a> {
    pub briefing: &'a Briefing,
    pub wave: u32,
    pub total_waves: u32,
    pub faction: Faction,
}

impl WaveContext<'_> {
    pub fn user_prompt(&self) -> String {
        format!(
            "Describe wave {}/{} of an assault against a {} {}.\nSituation: {}\nTitle: {}",
            self.wave,
            self.total_waves,
            self.faction,
            self.briefing.enemy_type,
            self.briefing.description,
            self.briefing.title
        )
    }
}

/// System prompt for tactical briefings
pub const BRIEFING_SYSTEM_PROMPT: &str = r#"You are the tactical terminal of a wasteland vault.
Given a territory and the faction holding it, invent one tactical encounter drawn from the
encounter table and report it as a SITREP.

OUTPUT FORMAT (JSON only, no explanation):
{
  "title": "short operation name",
  "description": "two or three sentences describing the situation",
  "enemyType": "the opposing force",
  "difficulty": 1-10,
  "rewardEstimate": "what the squad can expect to recover",
  "stabilityImpact": 5-25,
  "uniqueRewardType": "INTEL|PARTS|CAPS|REPUTATION"
}
"#;

/// System prompt for wave narration
pub const WAVE_SYSTEM_PROMPT: &str = r#"You narrate combat for a wasteland vault terminal.
Write one short, dark, immersive paragraph for the requested wave. Suggest a tactical
challenge (plasma turrets cycling, soldiers calling for backup). Do not decide the outcome.
Plain text only."#;
