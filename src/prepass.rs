use std::collections::{BTreeMap, BTreeSet};

use crate::constants::is_change_action;
use crate::types::{Action, EntityKind, Record};

// Stable by construction: records sharing a timestamp keep their input order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by_key(|record| record.timestamp);
}

pub fn compute_change_timestamps(records: &[Record]) -> BTreeSet<i64> {
    records
        .iter()
        .filter(|record| record.entity_kind().is_some() && is_change_action(record.action_tag()))
        .map(|record| record.timestamp)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct PendingKey {
    timestamp: i64,
    room: String,
    device: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingEvidence {
    drops: BTreeMap<PendingKey, u32>,
}

impl PendingEvidence {
    pub fn from_records(records: &[Record]) -> Self {
        let mut drops = BTreeMap::new();
        for record in records {
            if record.entity_kind() != Some(EntityKind::Ghost)
                || record.action_tag() != Some(Action::Evidence)
            {
                continue;
            }
            let key = PendingKey {
                timestamp: record.timestamp,
                room: record.room.clone(),
                device: record.extra.clone(),
            };
            *drops.entry(key).or_insert(0) += 1;
        }
        Self { drops }
    }

    pub fn outstanding(&self, timestamp: i64, room: &str, device: &str) -> u32 {
        self.drops
            .get(&PendingKey {
                timestamp,
                room: room.to_string(),
                device: device.to_string(),
            })
            .copied()
            .unwrap_or(0)
    }

    pub fn consume(&mut self, timestamp: i64, room: &str, device: &str) -> bool {
        let key = PendingKey {
            timestamp,
            room: room.to_string(),
            device: device.to_string(),
        };
        match self.drops.get_mut(&key) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn total_outstanding(&self) -> u32 {
        self.drops.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keeps_input_order_for_ties() {
        let mut records = vec![
            Record::new(20, "hunter", 1, "Van", "MOVE", "Hallway").with_provenance("a", 1),
            Record::new(10, "ghost", 9, "Kitchen", "IDLE", "").with_provenance("b", 1),
            Record::new(10, "hunter", 2, "Van", "INIT", "Ray").with_provenance("a", 2),
            Record::new(10, "ghost", 9, "Kitchen", "MOVE", "Garage").with_provenance("b", 2),
        ];
        sort_records(&mut records);
        let order: Vec<(i64, &str, usize)> = records
            .iter()
            .map(|r| (r.timestamp, r.provenance.source.as_str(), r.provenance.line))
            .collect();
        assert_eq!(order, vec![(10, "b", 1), (10, "a", 2), (10, "b", 2), (20, "a", 1)]);
    }

    #[test]
    fn change_timestamps_ignore_other_actions_and_entities() {
        let records = vec![
            Record::new(1, "hunter", 1, "Van", "INIT", "Ray"),
            Record::new(2, "hunter", 1, "Van", "SWAP", "EMF->ORBS"),
            Record::new(3, "ghost", 9, "Kitchen", "EXIT", ""),
            Record::new(4, "poltergeist", 9, "Kitchen", "MOVE", "Garage"),
            Record::new(5, "ghost", 9, "Kitchen", "EVIDENCE", "EMF"),
        ];
        let changes = compute_change_timestamps(&records);
        assert_eq!(changes, BTreeSet::from([1, 3]));
    }

    #[test]
    fn pending_counts_only_ghost_drops_by_extra_device() {
        let records = vec![
            Record::new(10, "ghost", 9, "Kitchen", "EVIDENCE", "EMF").with_device("ignored"),
            Record::new(10, "ghost", 9, "Kitchen", "EVIDENCE", "EMF"),
            Record::new(10, "hunter", 1, "Kitchen", "EVIDENCE", "EMF").with_device("EMF"),
            Record::new(11, "ghost", 9, "Kitchen", "EVIDENCE", "ORBS"),
        ];
        let pending = PendingEvidence::from_records(&records);
        assert_eq!(pending.outstanding(10, "Kitchen", "EMF"), 2);
        assert_eq!(pending.outstanding(11, "Kitchen", "ORBS"), 1);
        assert_eq!(pending.outstanding(11, "Kitchen", "EMF"), 0);
        assert_eq!(pending.total_outstanding(), 3);
    }

    #[test]
    fn consume_stops_at_zero() {
        let records = vec![Record::new(10, "ghost", 9, "Kitchen", "EVIDENCE", "EMF")];
        let mut pending = PendingEvidence::from_records(&records);
        assert!(pending.consume(10, "Kitchen", "EMF"));
        assert!(!pending.consume(10, "Kitchen", "EMF"));
        assert!(!pending.consume(12, "Garage", "EMF"));
        assert_eq!(pending.total_outstanding(), 0);
    }
}
