use super::*;

impl ReplayEngine {
    pub(super) fn apply_ghost<S: IssueSink>(&mut self, record: &mut Record, sink: &mut S) {
        let action = record.action_tag();
        if action == Some(Action::Init) {
            self.init_ghost(record, sink);
            return;
        }

        let Some(idx) = self.ghost_index(record.entity_id) else {
            let detail = format!("ghost {} seen before INIT", record.entity_id);
            flag(sink, record, IssueCategory::MissingInit, detail);
            return;
        };

        self.ghosts[idx].boredom = record.boredom;

        match action {
            Some(Action::Move) => self.move_ghost(idx, record, sink),
            Some(Action::Evidence) => self.drop_evidence(record, sink),
            Some(Action::Exit) => {
                if self.layout.contains(&record.room) {
                    self.rooms.set_ghost_present(&record.room, false);
                }
                self.ghosts[idx].room = None;
            }
            _ => {}
        }

        self.check_ghost_boredom(idx, record, sink);
    }

    fn init_ghost<S: IssueSink>(&mut self, record: &mut Record, sink: &mut S) {
        let state = GhostState {
            ghost_id: record.entity_id,
            ghost_type: record.extra.clone(),
            room: Some(record.room.clone()),
            boredom: record.boredom,
        };
        // Same silent overwrite as a repeated hunter INIT.
        match self.ghost_index(record.entity_id) {
            Some(idx) => self.ghosts[idx] = state,
            None => self.ghosts.push(state),
        }

        if self.layout.contains(&record.room) {
            self.rooms.set_ghost_present(&record.room, true);
        } else {
            let detail = format!("ghost {} init unknown room {}", record.entity_id, record.room);
            flag(sink, record, IssueCategory::Movement, detail);
        }
    }

    fn move_ghost<S: IssueSink>(&mut self, idx: usize, record: &mut Record, sink: &mut S) {
        let id = record.entity_id;
        let from_room = record.room.clone();
        let to_room = record.extra.clone();

        let remembered = self.ghosts[idx].room.clone();
        if remembered.as_deref() != Some(from_room.as_str()) {
            let detail = format!(
                "ghost {id} expected in {}, log shows {from_room}",
                room_label(remembered.as_deref())
            );
            flag(sink, record, IssueCategory::Movement, detail);
        }

        if self.layout.contains(&from_room) {
            self.rooms.set_ghost_present(&from_room, false);
        } else {
            let detail = format!("ghost {id} left unknown room {from_room}");
            flag(sink, record, IssueCategory::Movement, detail);
        }

        if self.layout.contains(&to_room) {
            self.rooms.set_ghost_present(&to_room, true);
        } else {
            let detail = format!("ghost {id} entered unknown room {to_room}");
            flag(sink, record, IssueCategory::Movement, detail);
        }

        if !self.layout.is_neighbor(&from_room, &to_room) {
            let detail = format!("ghost {id} invalid edge {from_room}->{to_room}");
            flag(sink, record, IssueCategory::Movement, detail);
        }

        self.ghosts[idx].room = Some(to_room);
    }

    fn drop_evidence<S: IssueSink>(&mut self, record: &mut Record, sink: &mut S) {
        let room = record.room.clone();
        let device = record.extra.clone();
        if !self.layout.contains(&room) {
            let detail = format!("ghost {} dropped evidence in unknown room {room}", record.entity_id);
            flag(sink, record, IssueCategory::Movement, detail);
            return;
        }
        self.rooms.increment_evidence(&room, &device);
        // Already counted in the room, so a same-instant pickup must not match it again.
        self.pending.consume(record.timestamp, &room, &device);
    }

    fn check_ghost_boredom<S: IssueSink>(&self, idx: usize, record: &mut Record, sink: &mut S) {
        let ghost = &self.ghosts[idx];
        let Some(room) = ghost.room.as_deref() else {
            return;
        };
        if self.rooms.has_hunters(room)
            && ghost.boredom != 0
            && !self.is_change_timestamp(record.timestamp)
        {
            let detail = format!(
                "ghost {} boredom {} with hunters in {room}",
                ghost.ghost_id, ghost.boredom
            );
            flag(sink, record, IssueCategory::Boredom, detail);
        }
    }
}
