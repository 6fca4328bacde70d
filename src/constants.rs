use crate::types::Action;

pub const START_ROOM: &str = "Van";
pub const SAMPLE_LIMIT: usize = 5;

pub const LOG_FILE_PREFIX: &str = "log_";
pub const LOG_FILE_SUFFIX: &str = ".csv";
pub const RECORD_FIELD_COUNT: usize = 9;
pub const SWAP_SEPARATOR: &str = "->";

pub const LOG_DIR_ENV: &str = "WILLOW_LOG_DIR";
pub const LAYOUT_PATH_ENV: &str = "WILLOW_LAYOUT_PATH";

pub const EXPORT_HEADER: [&str; 10] = [
    "timestamp",
    "entity_type",
    "entity_id",
    "room",
    "device",
    "boredom",
    "fear",
    "action",
    "extra",
    "issues",
];

pub fn is_change_action(action: Option<Action>) -> bool {
    matches!(
        action,
        Some(Action::Move) | Some(Action::Exit) | Some(Action::Init)
    )
}

pub fn is_log_file_name(name: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX) && name.ends_with(LOG_FILE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_actions_are_move_exit_and_init() {
        assert!(is_change_action(Some(Action::Move)));
        assert!(is_change_action(Some(Action::Exit)));
        assert!(is_change_action(Some(Action::Init)));
        assert!(!is_change_action(Some(Action::Evidence)));
        assert!(!is_change_action(Some(Action::Swap)));
        assert!(!is_change_action(None));
    }

    #[test]
    fn log_file_names_need_prefix_and_suffix() {
        assert!(is_log_file_name("log_68057.csv"));
        assert!(is_log_file_name("log_.csv"));
        assert!(!is_log_file_name("log.csv"));
        assert!(!is_log_file_name("combined.csv"));
        assert!(!is_log_file_name("log_1.txt"));
    }
}
