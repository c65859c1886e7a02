//! Production system - processes room production each tick batch
//!
//! The production pass iterates over every staffed, operable room, turns the
//! staff's relevant skill into an efficiency, and then:
//! - Checks the ledger covers the room's inputs for the whole batch (skips if not)
//! - Consumes the inputs
//! - Adds the room's output
//! - Applies the room's side effect (medbay healing, maintenance repair)
//!
//! Every room wears down by the configured decay regardless of the outcome.

use crate::core::config::ProductionConfig;
use crate::core::types::{AgentId, RoomId};
use crate::vault::agent::Agent;
use crate::vault::resources::{ResourceBundle, ResourceKind, Resources};
use crate::vault::room::{Room, RoomType};

/// Result of one room's production for a tick batch
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionResult {
    pub room: RoomId,
    pub room_type: RoomType,
    /// Resource and amount added to the ledger
    pub produced: Option<(ResourceKind, f64)>,
    /// Inputs removed from the ledger
    pub consumed: ResourceBundle,
    /// Staff healed by a medbay
    pub healed: Vec<AgentId>,
    /// Room repaired by a maintenance crew
    pub repaired: Option<RoomId>,
}

/// Life-support drain, applied before any room runs. Floors at zero.
pub fn apply_base_drain(resources: &mut Resources, config: &ProductionConfig, ticks: u64) {
    let n = ticks as f64;
    resources.drain(ResourceKind::Power, config.power_drain * n);
    resources.drain(ResourceKind::Water, config.water_drain * n);
    resources.drain(ResourceKind::Food, config.food_drain * n);
}

/// Sum of the staff's relevant skill divided by 100
pub fn staffing_efficiency(room: &Room, agents: &[Agent], config: &ProductionConfig) -> f64 {
    let skill = room.room_type.profile(config).skill;
    let total: u32 = room
        .staff
        .iter()
        .filter_map(|id| agents.iter().find(|a| a.id == *id))
        .map(|a| a.skills.get(skill))
        .sum();
    total as f64 / 100.0
}

/// Run production for every room, then apply integrity decay.
///
/// Returns one result per room that actually produced.
pub fn tick_production(
    rooms: &mut [Room],
    agents: &mut [Agent],
    resources: &mut Resources,
    config: &ProductionConfig,
    ticks: u64,
) -> Vec<ProductionResult> {
    let n = ticks as f64;
    let mut results = Vec::new();

    for i in 0..rooms.len() {
        if rooms[i].staff.is_empty() || !rooms[i].is_operable(config) {
            continue;
        }

        let profile = rooms[i].room_type.profile(config);
        let efficiency = staffing_efficiency(&rooms[i], agents, config);

        // Inputs are sized for the whole batch; short on any means no cycle at all
        let consumed: ResourceBundle = profile
            .inputs
            .iter()
            .map(|(kind, rate)| (*kind, rate * n))
            .collect();
        if !resources.consume_materials(&consumed) {
            tracing::debug!(room = %rooms[i].id, "inputs short, production skipped");
            continue;
        }

        let produced = profile.output.map(|(kind, base_rate)| {
            let amount = efficiency * base_rate * rooms[i].level as f64 * n;
            resources.add(kind, amount);
            (kind, amount)
        });

        let mut healed = Vec::new();
        let mut repaired = None;
        match rooms[i].room_type {
            RoomType::Medbay => {
                let heal = config.heal_rate * n;
                for agent in agents.iter_mut().filter(|a| rooms[i].staff.contains(&a.id)) {
                    agent.heal(heal);
                    healed.push(agent.id);
                }
            }
            RoomType::Maintenance => {
                if let Some(target) = most_worn_room(rooms) {
                    rooms[target].repair(config.repair_rate * n);
                    repaired = Some(rooms[target].id);
                }
            }
            _ => {}
        }

        results.push(ProductionResult {
            room: rooms[i].id,
            room_type: rooms[i].room_type,
            produced,
            consumed,
            healed,
            repaired,
        });
    }

    let decay = config.integrity_decay * n;
    for room in rooms.iter_mut() {
        room.decay(decay);
    }

    results
}

/// Index of the room with the lowest integrity; the first one wins ties
fn most_worn_room(rooms: &[Room]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, room) in rooms.iter().enumerate() {
        match best {
            Some(b) if rooms[b].integrity <= room.integrity => {}
            _ => best = Some(i),
        }
    }
    best
}
