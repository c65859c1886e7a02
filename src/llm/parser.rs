//! Parse and validate narrative collaborator responses
//!
//! The collaborator is outside our control, so nothing it returns is trusted:
//! briefings are extracted, deserialized against a strict schema and
//! range-checked before they can reach the game state.

use crate::campaign::assault::Briefing;
use crate::core::error::NarrativeError;

/// Parse a tactical briefing from a raw LLM response
pub fn parse_briefing(response: &str) -> Result<Briefing, NarrativeError> {
    let json_str = extract_json(response)?;

    let briefing: Briefing = serde_json::from_str(json_str).map_err(|e| {
        NarrativeError::Malformed(format!("{} - Response: {}", e, response))
    })?;

    briefing.validate()?;
    Ok(briefing)
}

/// Normalise a wave narrative; blank text counts as an empty response
pub fn parse_wave_narrative(response: &str) -> Result<String, NarrativeError> {
    let text = response.trim();
    if text.is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str, NarrativeError> {
    let start = response.find('{').ok_or(NarrativeError::NoJson)?;
    let end = response.rfind('}').ok_or(NarrativeError::NoJson)?;
    if end < start {
        return Err(NarrativeError::NoJson);
    }
    Ok(&response[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::assault::RewardType;

    const VALID: &str = r#"{
        "title": "Ranger Shortfall",
        "description": "An NCR patrol is holding the bridge on half rations.",
        "enemyType": "NCR Patrol Unit",
        "difficulty": 4,
        "rewardEstimate": "Ration crates and ammunition",
        "stabilityImpact": 12,
        "uniqueRewardType": "CAPS"
    }"#;

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = format!("SITREP follows:\n{}\nEnd of transmission.", VALID);
        let json = extract_json(&response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn test_extract_json_no_json() {
        assert_eq!(extract_json("static on all channels"), Err(NarrativeError::NoJson));
        assert_eq!(extract_json("} backwards {"), Err(NarrativeError::NoJson));
    }

    #[test]
    fn test_parse_valid_briefing() {
        let briefing = parse_briefing(VALID).unwrap();
        assert_eq!(briefing.enemy_type, "NCR Patrol Unit");
        assert_eq!(briefing.difficulty, 4.0);
        assert_eq!(briefing.stability_impact, 12.0);
        assert_eq!(briefing.unique_reward_type, RewardType::Caps);
    }

    #[test]
    fn test_missing_field_is_typed_error() {
        let response = r#"{"title": "x", "description": "y", "enemyType": "z", "difficulty": 3}"#;
        assert!(matches!(
            parse_briefing(response),
            Err(NarrativeError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_typed_error() {
        let response = VALID.replace("\"difficulty\": 4", "\"difficulty\": \"hard\"");
        assert!(matches!(
            parse_briefing(&response),
            Err(NarrativeError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_reward_type_rejected() {
        let response = VALID.replace("CAPS", "GOLD");
        assert!(parse_briefing(&response).is_err());
    }

    #[test]
    fn test_out_of_range_difficulty() {
        let response = VALID.replace("\"difficulty\": 4", "\"difficulty\": 42");
        assert_eq!(
            parse_briefing(&response),
            Err(NarrativeError::OutOfRange {
                field: "difficulty",
                value: 42.0
            })
        );
    }

    #[test]
    fn test_wave_narrative() {
        assert_eq!(
            parse_wave_narrative("  The turrets are cycling.\n").unwrap(),
            "The turrets are cycling."
        );
        assert_eq!(parse_wave_narrative("   "), Err(NarrativeError::EmptyResponse));
    }
}
