use std::collections::BTreeSet;

use crate::ledger::RoomLedger;
use crate::prepass::{compute_change_timestamps, sort_records, PendingEvidence};
use crate::report::{IssueReport, IssueSink};
use crate::types::{Action, EntityKind, IssueCategory, Record};
use crate::world::HouseLayout;

mod ghost_system;
mod hunter_system;
mod utils;

use self::utils::{flag, parse_swap_target, room_label};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HunterState {
    pub hunter_id: i64,
    pub name: String,
    pub room: Option<String>,
    pub device: String,
    pub boredom: i32,
    pub fear: i32,
    pub returning: bool,
    pub return_stack: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GhostState {
    pub ghost_id: i64,
    pub ghost_type: String,
    pub room: Option<String>,
    pub boredom: i32,
}

#[derive(Clone, Debug)]
pub struct ReplayEngine {
    layout: HouseLayout,
    rooms: RoomLedger,
    hunters: Vec<HunterState>,
    ghosts: Vec<GhostState>,
    change_timestamps: BTreeSet<i64>,
    pending: PendingEvidence,
}

#[derive(Clone, Debug)]
pub struct ReplayOutcome {
    pub entries: usize,
    pub report: IssueReport,
    pub rooms: RoomLedger,
}

pub fn validate(records: &mut [Record], layout: &HouseLayout) -> ReplayOutcome {
    sort_records(records);
    let mut engine = ReplayEngine::new(layout.clone(), records);
    let mut report = IssueReport::new();
    engine.run(records, &mut report);
    ReplayOutcome {
        entries: records.len(),
        report,
        rooms: engine.rooms,
    }
}

impl ReplayEngine {
    // `records` must already be in replay order.
    pub fn new(layout: HouseLayout, records: &[Record]) -> Self {
        let rooms = RoomLedger::new(&layout);
        Self {
            layout,
            rooms,
            hunters: Vec::new(),
            ghosts: Vec::new(),
            change_timestamps: compute_change_timestamps(records),
            pending: PendingEvidence::from_records(records),
        }
    }

    pub fn run<S: IssueSink>(&mut self, records: &mut [Record], sink: &mut S) {
        for record in records.iter_mut() {
            self.step(record, sink);
        }
    }

    pub fn step<S: IssueSink>(&mut self, record: &mut Record, sink: &mut S) {
        match record.entity_kind() {
            Some(EntityKind::Hunter) => self.apply_hunter(record, sink),
            Some(EntityKind::Ghost) => self.apply_ghost(record, sink),
            None => {
                let detail = format!("unknown entity type '{}'", record.entity_type);
                flag(sink, record, IssueCategory::UnknownEntity, detail);
            }
        }
    }

    pub fn rooms(&self) -> &RoomLedger {
        &self.rooms
    }

    pub fn hunter(&self, hunter_id: i64) -> Option<&HunterState> {
        self.hunters.iter().find(|hunter| hunter.hunter_id == hunter_id)
    }

    pub fn ghost(&self, ghost_id: i64) -> Option<&GhostState> {
        self.ghosts.iter().find(|ghost| ghost.ghost_id == ghost_id)
    }

    pub fn pending(&self) -> &PendingEvidence {
        &self.pending
    }

    fn hunter_index(&self, hunter_id: i64) -> Option<usize> {
        self.hunters
            .iter()
            .position(|hunter| hunter.hunter_id == hunter_id)
    }

    fn ghost_index(&self, ghost_id: i64) -> Option<usize> {
        self.ghosts.iter().position(|ghost| ghost.ghost_id == ghost_id)
    }

    fn is_change_timestamp(&self, timestamp: i64) -> bool {
        self.change_timestamps.contains(&timestamp)
    }
}
