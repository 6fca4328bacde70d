use std::fmt::Display;

use crate::constants::SWAP_SEPARATOR;
use crate::report::IssueSink;
use crate::types::{IssueCategory, Record};

pub(super) fn flag<S: IssueSink>(
    sink: &mut S,
    record: &mut Record,
    category: IssueCategory,
    detail: impl Display,
) {
    let detail = format!("{} {detail}", record.provenance);
    sink.report(category, record.timestamp, detail, &mut record.issues);
}

pub(super) fn room_label(room: Option<&str>) -> &str {
    room.unwrap_or("nowhere")
}

pub(super) fn parse_swap_target(extra: &str) -> Option<&str> {
    extra
        .split_once(SWAP_SEPARATOR)
        .map(|(_, to_device)| to_device.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_target_takes_text_after_first_separator() {
        assert_eq!(parse_swap_target("EMF->ORBS"), Some("ORBS"));
        assert_eq!(parse_swap_target("EMF-> RADIO "), Some("RADIO"));
        assert_eq!(parse_swap_target("A->B->C"), Some("B->C"));
        assert_eq!(parse_swap_target("EMF"), None);
        assert_eq!(parse_swap_target(""), None);
    }

    #[test]
    fn room_label_names_absent_rooms() {
        assert_eq!(room_label(None), "nowhere");
        assert_eq!(room_label(Some("Garage")), "Garage");
    }
}
