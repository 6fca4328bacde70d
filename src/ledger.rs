use std::collections::{BTreeMap, BTreeSet};

use crate::world::HouseLayout;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomState {
    pub name: String,
    pub neighbors: Vec<String>,
    pub hunters: BTreeSet<i64>,
    pub ghost_present: bool,
    evidence: BTreeMap<String, u32>,
}

impl RoomState {
    fn new(name: &str, neighbors: &[String]) -> Self {
        Self {
            name: name.to_string(),
            neighbors: neighbors.to_vec(),
            hunters: BTreeSet::new(),
            ghost_present: false,
            evidence: BTreeMap::new(),
        }
    }

    pub fn evidence_count(&self, device: &str) -> u32 {
        self.evidence.get(device).copied().unwrap_or(0)
    }
}

// Per-room occupancy and evidence counts. Callers check that a room exists
// before mutating it; every operation on an unknown room is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomLedger {
    rooms: BTreeMap<String, RoomState>,
}

impl RoomLedger {
    pub fn new(layout: &HouseLayout) -> Self {
        let rooms = layout
            .room_names()
            .map(|name| (name.to_string(), RoomState::new(name, layout.neighbors(name))))
            .collect();
        Self { rooms }
    }

    pub fn room(&self, name: &str) -> Option<&RoomState> {
        self.rooms.get(name)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomState> {
        self.rooms.values()
    }

    pub fn has_hunter(&self, room: &str, hunter_id: i64) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|state| state.hunters.contains(&hunter_id))
    }

    pub fn has_hunters(&self, room: &str) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|state| !state.hunters.is_empty())
    }

    pub fn add_hunter(&mut self, room: &str, hunter_id: i64) {
        if let Some(state) = self.rooms.get_mut(room) {
            state.hunters.insert(hunter_id);
        }
    }

    pub fn remove_hunter(&mut self, room: &str, hunter_id: i64) -> bool {
        self.rooms
            .get_mut(room)
            .is_some_and(|state| state.hunters.remove(&hunter_id))
    }

    pub fn set_ghost_present(&mut self, room: &str, present: bool) {
        if let Some(state) = self.rooms.get_mut(room) {
            state.ghost_present = present;
        }
    }

    pub fn increment_evidence(&mut self, room: &str, device: &str) {
        if let Some(state) = self.rooms.get_mut(room) {
            *state.evidence.entry(device.to_string()).or_insert(0) += 1;
        }
    }

    pub fn try_decrement_evidence(&mut self, room: &str, device: &str) -> bool {
        let Some(count) = self
            .rooms
            .get_mut(room)
            .and_then(|state| state.evidence.get_mut(device))
        else {
            return false;
        };
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    pub fn total_hunters(&self) -> usize {
        self.rooms.values().map(|state| state.hunters.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> RoomLedger {
        RoomLedger::new(&HouseLayout::willow())
    }

    #[test]
    fn rooms_copy_neighbors_from_layout() {
        let ledger = ledger();
        let kitchen = ledger.room("Kitchen").expect("kitchen exists");
        assert_eq!(kitchen.neighbors, ["Hallway", "Living Room", "Garage"]);
        assert!(kitchen.hunters.is_empty());
        assert!(!kitchen.ghost_present);
    }

    #[test]
    fn remove_hunter_signals_absence() {
        let mut ledger = ledger();
        assert!(!ledger.remove_hunter("Van", 1));
        ledger.add_hunter("Van", 1);
        assert!(ledger.has_hunter("Van", 1));
        assert!(ledger.remove_hunter("Van", 1));
        assert!(!ledger.remove_hunter("Van", 1));
        assert_eq!(ledger.total_hunters(), 0);
    }

    #[test]
    fn evidence_defaults_to_zero_and_never_goes_negative() {
        let mut ledger = ledger();
        assert_eq!(ledger.room("Garage").map(|r| r.evidence_count("EMF")), Some(0));
        assert!(!ledger.try_decrement_evidence("Garage", "EMF"));
        ledger.increment_evidence("Garage", "EMF");
        ledger.increment_evidence("Garage", "EMF");
        assert!(ledger.try_decrement_evidence("Garage", "EMF"));
        assert!(ledger.try_decrement_evidence("Garage", "EMF"));
        assert!(!ledger.try_decrement_evidence("Garage", "EMF"));
        assert_eq!(ledger.room("Garage").map(|r| r.evidence_count("EMF")), Some(0));
    }

    #[test]
    fn unknown_room_operations_are_no_ops() {
        let mut ledger = ledger();
        ledger.add_hunter("Attic", 3);
        ledger.set_ghost_present("Attic", true);
        ledger.increment_evidence("Attic", "ORBS");
        assert!(ledger.room("Attic").is_none());
        assert!(!ledger.has_hunter("Attic", 3));
        assert!(!ledger.try_decrement_evidence("Attic", "ORBS"));
        assert_eq!(ledger.total_hunters(), 0);
    }
}
