//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Declares a numeric identifier that prints and parses with a short prefix
/// (`a1`, `r3`, ...) so the CLI and log lines can refer to it directly.
macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn new(id: u32) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.trim().strip_prefix($prefix).unwrap_or(s.trim());
                digits
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|_| ParseIdError(s.to_string()))
            }
        }
    };
}

prefixed_id!(
    /// Unique identifier for vault agents
    AgentId,
    "a"
);
prefixed_id!(
    /// Unique identifier for vault rooms
    RoomId,
    "r"
);
prefixed_id!(
    /// Unique identifier for mission templates
    MissionId,
    "m"
);
prefixed_id!(
    /// Unique identifier for map territories
    TerritoryId,
    "t"
);
prefixed_id!(
    /// Unique identifier for hydroponics slots
    SlotId,
    "s"
);
prefixed_id!(ChallengeId, "c");

/// Returned when a prefixed id string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError(pub String);

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid id: {}", self.0)
    }
}

impl std::error::Error for ParseIdError {}

/// Wasteland factions that can own territory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    #[serde(rename = "NCR")]
    Ncr,
    #[serde(rename = "BOS")]
    Brotherhood,
    #[serde(rename = "ENCLAVE")]
    Enclave,
    #[serde(rename = "HOUSE")]
    House,
    #[serde(rename = "IND")]
    Independent,
}

impl Faction {
    pub const ALL: [Faction; 5] = [
        Faction::Ncr,
        Faction::Brotherhood,
        Faction::Enclave,
        Faction::House,
        Faction::Independent,
    ];

    /// Short tag used on the map and in prompts
    pub fn tag(&self) -> &'static str {
        match self {
            Faction::Ncr => "NCR",
            Faction::Brotherhood => "BOS",
            Faction::Enclave => "ENCLAVE",
            Faction::House => "HOUSE",
            Faction::Independent => "IND",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Environmental seasons, cycled every 28 days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Season {
    RadBloom,
    SolarFlare,
    AshFall,
    NuclearWinter,
}

impl Season {
    /// Next season in the fixed cycle
    pub fn next(self) -> Self {
        match self {
            Season::RadBloom => Season::SolarFlare,
            Season::SolarFlare => Season::AshFall,
            Season::AshFall => Season::NuclearWinter,
            Season::NuclearWinter => Season::RadBloom,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::RadBloom => "RAD-BLOOM",
            Season::SolarFlare => "SOLAR-FLARE",
            Season::AshFall => "ASH-FALL",
            Season::NuclearWinter => "NUCLEAR-WINTER",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        assert_eq!(AgentId(3).to_string(), "a3");
        assert_eq!("a3".parse::<AgentId>().unwrap(), AgentId(3));
        assert_eq!("7".parse::<RoomId>().unwrap(), RoomId(7));
        assert!("x9".parse::<RoomId>().is_err());
    }

    #[test]
    fn test_season_cycle_wraps() {
        let mut season = Season::RadBloom;
        for _ in 0..4 {
            season = season.next();
        }
        assert_eq!(season, Season::RadBloom);
        assert_eq!(Season::AshFall.next(), Season::NuclearWinter);
    }

    #[test]
    fn test_faction_serialization() {
        let json = serde_json::to_string(&Faction::Brotherhood).unwrap();
        assert_eq!(json, "\"BOS\"");
        let season: Season = serde_json::from_str("\"NUCLEAR-WINTER\"").unwrap();
        assert_eq!(season, Season::NuclearWinter);
    }
}
