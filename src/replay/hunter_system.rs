use super::*;

impl ReplayEngine {
    pub(super) fn apply_hunter<S: IssueSink>(&mut self, record: &mut Record, sink: &mut S) {
        let action = record.action_tag();
        if action == Some(Action::Init) {
            self.init_hunter(record, sink);
            return;
        }

        let Some(idx) = self.hunter_index(record.entity_id) else {
            let detail = format!("hunter {} seen before INIT", record.entity_id);
            flag(sink, record, IssueCategory::MissingInit, detail);
            return;
        };

        self.hunters[idx].boredom = record.boredom;
        self.hunters[idx].fear = record.fear;

        match action {
            Some(Action::Move) => self.move_hunter(idx, record, sink),
            Some(Action::Evidence) => self.collect_evidence(idx, record, sink),
            Some(Action::Swap) => {
                // Malformed swaps are dropped without an issue.
                if let Some(to_device) = parse_swap_target(&record.extra) {
                    self.hunters[idx].device = to_device.to_string();
                }
            }
            Some(Action::ReturnStart) => {
                let hunter = &mut self.hunters[idx];
                if hunter.room.as_deref() != Some(self.layout.start_room()) {
                    hunter.returning = true;
                }
            }
            Some(Action::ReturnComplete) => self.complete_return(idx, record, sink),
            Some(Action::Exit) => self.exit_hunter(idx, record, sink),
            _ => {}
        }

        self.check_hunter_boredom(idx, record, sink);
    }

    fn init_hunter<S: IssueSink>(&mut self, record: &mut Record, sink: &mut S) {
        let state = HunterState {
            hunter_id: record.entity_id,
            name: record.extra.clone(),
            room: Some(record.room.clone()),
            device: record.device.clone(),
            boredom: record.boredom,
            fear: record.fear,
            returning: false,
            return_stack: Vec::new(),
        };
        // A repeated INIT overwrites the earlier state and leaves its occupancy
        // behind. Candidate for a future duplicate_init category.
        match self.hunter_index(record.entity_id) {
            Some(idx) => self.hunters[idx] = state,
            None => self.hunters.push(state),
        }

        if self.layout.contains(&record.room) {
            self.rooms.add_hunter(&record.room, record.entity_id);
        } else {
            let detail = format!("unknown room '{}' during INIT", record.room);
            flag(sink, record, IssueCategory::Movement, detail);
        }
    }

    fn move_hunter<S: IssueSink>(&mut self, idx: usize, record: &mut Record, sink: &mut S) {
        let id = record.entity_id;
        let from_room = record.room.clone();
        let to_room = record.extra.clone();

        let remembered = self.hunters[idx].room.clone();
        if remembered.as_deref() != Some(from_room.as_str()) {
            let detail = format!(
                "hunter {id} expected in {}, log shows {from_room}",
                room_label(remembered.as_deref())
            );
            flag(sink, record, IssueCategory::Movement, detail);
        }

        if !self.layout.contains(&from_room) || !self.layout.contains(&to_room) {
            let detail = format!("hunter {id} unknown room in move {from_room}->{to_room}");
            flag(sink, record, IssueCategory::Movement, detail);
        } else {
            if !self.layout.is_neighbor(&from_room, &to_room) {
                let detail = format!("hunter {id} invalid edge {from_room}->{to_room}");
                flag(sink, record, IssueCategory::Movement, detail);
            }
            if !self.rooms.remove_hunter(&from_room, id) {
                let detail = format!("hunter {id} not recorded in {from_room} before move");
                flag(sink, record, IssueCategory::Movement, detail);
            }
            self.rooms.add_hunter(&to_room, id);
        }

        let start_room = self.layout.start_room();
        let hunter = &mut self.hunters[idx];
        if hunter.returning {
            match hunter.return_stack.pop() {
                Some(expected) if expected != to_room => {
                    let detail = format!("hunter {id} expected {expected} on return, got {to_room}");
                    flag(sink, record, IssueCategory::Return, detail);
                }
                Some(_) => {}
                None if to_room != start_room => {
                    let detail = format!("hunter {id} return stack empty but moved to {to_room}");
                    flag(sink, record, IssueCategory::Return, detail);
                }
                None => {}
            }
        } else if !from_room.is_empty() {
            hunter.return_stack.push(from_room);
        }

        if to_room == start_room {
            hunter.return_stack.clear();
        }
        hunter.room = Some(to_room);
    }

    fn collect_evidence<S: IssueSink>(&mut self, idx: usize, record: &mut Record, sink: &mut S) {
        let id = record.entity_id;
        let room = record.room.clone();
        let device = record.device.clone();

        let hunter = &mut self.hunters[idx];
        if !device.is_empty() && device != hunter.device {
            let detail = format!(
                "hunter {id} logged device {device} but state has {}",
                hunter.device
            );
            flag(sink, record, IssueCategory::Evidence, detail);
        }
        if room != self.layout.start_room() {
            hunter.returning = true;
        }

        if !self.layout.contains(&room) {
            let detail = format!("hunter {id} evidence in unknown room {room}");
            flag(sink, record, IssueCategory::Movement, detail);
            return;
        }
        // A drop logged at the same instant may come after the pickup.
        if !self.rooms.try_decrement_evidence(&room, &device)
            && !self.pending.consume(record.timestamp, &room, &device)
        {
            let detail = format!("hunter {id} collected {device} but room missing evidence");
            flag(sink, record, IssueCategory::Evidence, detail);
        }
    }

    fn complete_return<S: IssueSink>(&mut self, idx: usize, record: &mut Record, sink: &mut S) {
        let id = record.entity_id;
        let start_room = self.layout.start_room();
        let hunter = &mut self.hunters[idx];
        if hunter.room.as_deref() != Some(start_room) {
            let detail = format!(
                "hunter {id} completed return outside {start_room} in {}",
                room_label(hunter.room.as_deref())
            );
            flag(sink, record, IssueCategory::Return, detail);
        }
        if !hunter.return_stack.is_empty() {
            let detail = format!(
                "hunter {id} return stack not empty on completion ({} left)",
                hunter.return_stack.len()
            );
            flag(sink, record, IssueCategory::Return, detail);
        }
        hunter.return_stack.clear();
        hunter.returning = false;
    }

    fn exit_hunter<S: IssueSink>(&mut self, idx: usize, record: &mut Record, sink: &mut S) {
        let id = record.entity_id;
        let room = record.room.clone();
        if !(self.layout.contains(&room) && self.rooms.remove_hunter(&room, id)) {
            let detail = format!("hunter {id} exit from room without occupancy ({room})");
            flag(sink, record, IssueCategory::Movement, detail);
        }
        let hunter = &mut self.hunters[idx];
        hunter.room = None;
        hunter.return_stack.clear();
        hunter.returning = false;
    }

    fn check_hunter_boredom<S: IssueSink>(&self, idx: usize, record: &mut Record, sink: &mut S) {
        // The game runs a single ghost; the first one initialised is it.
        let Some(ghost_room) = self.ghosts.first().and_then(|ghost| ghost.room.as_deref()) else {
            return;
        };
        let hunter = &self.hunters[idx];
        if hunter.room.as_deref() == Some(ghost_room)
            && hunter.boredom != 0
            && !self.is_change_timestamp(record.timestamp)
        {
            let detail = format!(
                "hunter {} boredom {} with ghost in {ghost_room}",
                hunter.hunter_id, hunter.boredom
            );
            flag(sink, record, IssueCategory::Boredom, detail);
        }
    }
}
