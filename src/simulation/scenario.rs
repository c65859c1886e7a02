//! Initial game state - the vault as it boots

use crate::campaign::territory::Territory;
use crate::core::calendar::Calendar;
use crate::core::config::SimulationConfig;
use crate::core::types::{AgentId, ChallengeId, Faction, MissionId, RoomId, SlotId, TerritoryId};
use crate::simulation::state::{GameState, Vault};
use crate::vault::agent::{Agent, SkillKind, Skills};
use crate::vault::challenge::{Challenge, ChallengeKind};
use crate::vault::events::{EventLog, LogCategory};
use crate::vault::hydroponics::HydroSlot;
use crate::vault::missions::Mission;
use crate::vault::resources::{ResourceKind, Resources};
use crate::vault::room::{Room, RoomType};

/// Default map: (name, hostility, owner, revenue)
const TERRITORIES: [(&str, f64, Faction, f64); 6] = [
    ("Downtown Bakersfield", 0.7, Faction::Ncr, 1.5),
    ("Industrial Sector South", 0.9, Faction::Enclave, 2.1),
    ("Necropolis Ruins", 0.5, Faction::Brotherhood, 1.1),
    ("Oildale Frontier", 0.4, Faction::House, 0.8),
    ("Kern River Outpost", 0.6, Faction::Ncr, 1.3),
    ("Buck Owens Memorial", 0.3, Faction::Independent, 0.5),
];

pub fn initial_territories() -> Vec<Territory> {
    TERRITORIES
        .iter()
        .enumerate()
        .map(|(i, (name, hostility, owner, revenue))| {
            Territory::new(TerritoryId(i as u32 + 1), *name, *hostility, *owner)
                .with_revenue(*revenue)
        })
        .collect()
}

pub fn initial_roster() -> Vec<Agent> {
    vec![
        Agent::new(AgentId(1), "Ronin-7", Skills::new(10, 85, 85, 40, 50))
            .with_traits(&["Stoic"])
            .with_karma(50),
        Agent::new(AgentId(2), "Scribe Vax", Skills::new(40, 20, 20, 75, 90))
            .with_traits(&["Genius"])
            .with_karma(85),
        Agent::new(AgentId(3), "Merc-X", Skills::new(5, 30, 95, 10, 20))
            .with_traits(&["Brutal"])
            .with_karma(10),
    ]
}

pub fn initial_rooms() -> Vec<Room> {
    vec![
        Room::new(RoomId(1), RoomType::Power),
        Room::new(RoomId(2), RoomType::Hydro),
        Room::new(RoomId(3), RoomType::Network),
        Room::new(RoomId(4), RoomType::Maintenance),
    ]
}

pub fn initial_missions() -> Vec<Mission> {
    vec![Mission {
        id: MissionId(1),
        name: "Scavenge Ruins".into(),
        description: "Search for pre-war electronics.".into(),
        difficulty: 3,
        required_skill: SkillKind::Tech,
        duration: 15,
        rewards: vec![(ResourceKind::Parts, 10.0), (ResourceKind::Intel, 5.0)],
    }]
}

pub fn initial_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: ChallengeId(1),
            title: "Power Surge".into(),
            requirement: "Produce 500 Power".into(),
            kind: ChallengeKind::ProducePower,
            progress: 100.0,
            goal: 500.0,
            completed: false,
        },
        Challenge {
            id: ChallengeId(2),
            title: "First Harvest".into(),
            requirement: "Harvest 5 Crops".into(),
            kind: ChallengeKind::HarvestCrops,
            progress: 0.0,
            goal: 5.0,
            completed: false,
        },
    ]
}

/// Fresh game: NCR player, three agents, four rooms, three empty slots
pub fn initial_state(config: &SimulationConfig) -> GameState {
    let mut vault = Vault {
        calendar: Calendar::new(config.cycle.ticks_per_day, config.cycle.days_per_season),
        agents: initial_roster(),
        rooms: initial_rooms(),
        hydroponics: (1..=3).map(|i| HydroSlot::empty(SlotId(i))).collect(),
        resources: Resources {
            power: 100.0,
            water: 100.0,
            food: 100.0,
            meds: 10.0,
            parts: 20.0,
            intel: 0.0,
            caps: 500.0,
        },
        active_missions: Vec::new(),
        available_missions: initial_missions(),
        challenges: initial_challenges(),
        event_log: EventLog::new(),
        active_assault: None,
    };
    vault.log(LogCategory::System, "Strand OS v1.0 Kernel Booted.");

    GameState {
        player_faction: Faction::Ncr,
        reputation: 100,
        territories: initial_territories(),
        vault,
    }
}
