//! GameState - the aggregate every action transitions

use serde::{Deserialize, Serialize};

use crate::campaign::assault::AssaultState;
use crate::campaign::territory::Territory;
use crate::core::calendar::Calendar;
use crate::core::types::{AgentId, Faction, MissionId, RoomId, Season, SlotId, TerritoryId, Tick};
use crate::vault::agent::{Agent, Assignment};
use crate::vault::challenge::Challenge;
use crate::vault::events::{EventLog, LogCategory};
use crate::vault::hydroponics::HydroSlot;
use crate::vault::missions::{ActiveMission, Mission};
use crate::vault::resources::Resources;
use crate::vault::room::Room;

/// Everything the player owns or can see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player_faction: Faction,
    pub reputation: u32,
    pub territories: Vec<Territory>,
    pub vault: Vault,
}

/// The player's base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    pub calendar: Calendar,
    pub agents: Vec<Agent>,
    pub rooms: Vec<Room>,
    pub hydroponics: Vec<HydroSlot>,
    pub resources: Resources,
    pub active_missions: Vec<ActiveMission>,
    pub available_missions: Vec<Mission>,
    pub challenges: Vec<Challenge>,
    pub event_log: EventLog,
    pub active_assault: Option<AssaultState>,
}

impl Vault {
    pub fn tick(&self) -> Tick {
        self.calendar.current_tick()
    }

    pub fn day(&self) -> u64 {
        self.calendar.current_day()
    }

    pub fn season(&self) -> Season {
        self.calendar.season()
    }

    /// Append a log entry stamped with the current tick and day
    pub fn log(&mut self, category: LogCategory, message: impl Into<String>) {
        let (tick, day) = (self.tick(), self.day());
        self.event_log.push(category, message, tick, day);
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut HydroSlot> {
        self.hydroponics.iter_mut().find(|s| s.id == id)
    }

    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        self.available_missions.iter().find(|m| m.id == id)
    }

    /// Change an agent's assignment, keeping every room's staff list in step.
    ///
    /// The agent is removed from all staff lists first, then added to the
    /// target room if the new assignment is a room.
    pub fn set_assignment(&mut self, id: AgentId, assignment: Assignment) {
        for room in self.rooms.iter_mut() {
            room.remove_staff(id);
        }
        if let Assignment::Room(room_id) = assignment {
            if let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) {
                room.add_staff(id);
            }
        }
        if let Some(agent) = self.agent_mut(id) {
            agent.assignment = assignment;
        }
    }

    pub fn idle_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.assignment.is_idle())
    }

    /// True if every agent's assignment agrees with the room staff lists
    pub fn assignments_consistent(&self) -> bool {
        let agents_ok = self.agents.iter().all(|agent| {
            let rooms_holding: Vec<RoomId> = self
                .rooms
                .iter()
                .filter(|r| r.staff.contains(&agent.id))
                .map(|r| r.id)
                .collect();
            match agent.assignment {
                Assignment::Room(id) => rooms_holding == vec![id],
                _ => rooms_holding.is_empty(),
            }
        });
        let staff_ok = self.rooms.iter().all(|room| {
            room.staff
                .iter()
                .all(|id| self.agent(*id).map(|a| a.assignment) == Some(Assignment::Room(room.id)))
        });
        agents_ok && staff_ok
    }
}

impl GameState {
    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.iter().find(|t| t.id == id)
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> Option<&mut Territory> {
        self.territories.iter_mut().find(|t| t.id == id)
    }

    pub fn territories_held(&self) -> usize {
        self.territories
            .iter()
            .filter(|t| t.owner == self.player_faction)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::scenario::initial_state;
    use crate::core::config::SimulationConfig;

    #[test]
    fn test_set_assignment_moves_between_rooms() {
        let mut state = initial_state(&SimulationConfig::default());
        let vault = &mut state.vault;

        vault.set_assignment(AgentId(1), Assignment::Room(RoomId(1)));
        vault.set_assignment(AgentId(1), Assignment::Room(RoomId(2)));

        assert!(vault.room(RoomId(1)).unwrap().staff.is_empty());
        assert_eq!(vault.room(RoomId(2)).unwrap().staff, vec![AgentId(1)]);
        assert!(vault.assignments_consistent());

        vault.set_assignment(AgentId(1), Assignment::Idle);
        assert!(vault.room(RoomId(2)).unwrap().staff.is_empty());
        assert!(vault.assignments_consistent());
    }

    #[test]
    fn test_log_is_stamped() {
        let mut state = initial_state(&SimulationConfig::default());
        state.vault.log(LogCategory::System, "hello");
        let entry = state.vault.event_log.last().unwrap();
        assert_eq!(entry.tick, 0);
        assert_eq!(entry.day, 1);
    }
}
