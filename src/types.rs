use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Hunter,
    Ghost,
}

impl EntityKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "hunter" => Some(Self::Hunter),
            "ghost" => Some(Self::Ghost),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Init,
    Move,
    Evidence,
    Swap,
    ReturnStart,
    ReturnComplete,
    Exit,
    Idle,
}

impl Action {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "INIT" => Some(Self::Init),
            "MOVE" => Some(Self::Move),
            "EVIDENCE" => Some(Self::Evidence),
            "SWAP" => Some(Self::Swap),
            "RETURN_START" => Some(Self::ReturnStart),
            "RETURN_COMPLETE" => Some(Self::ReturnComplete),
            "EXIT" => Some(Self::Exit),
            "IDLE" => Some(Self::Idle),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Movement,
    Return,
    Evidence,
    Boredom,
    MissingInit,
    UnknownEntity,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 6] = [
        IssueCategory::Movement,
        IssueCategory::Return,
        IssueCategory::Evidence,
        IssueCategory::Boredom,
        IssueCategory::MissingInit,
        IssueCategory::UnknownEntity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movement => "movement",
            Self::Return => "return",
            Self::Evidence => "evidence",
            Self::Boredom => "boredom",
            Self::MissingInit => "missing_init",
            Self::UnknownEntity => "unknown_entity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Provenance {
    pub source: String,
    pub line: usize,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub timestamp: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub room: String,
    pub device: String,
    pub boredom: i32,
    pub fear: i32,
    pub action: String,
    pub extra: String,
    pub provenance: Provenance,
    pub issues: BTreeSet<IssueCategory>,
}

impl Record {
    pub fn new(
        timestamp: i64,
        entity_type: &str,
        entity_id: i64,
        room: &str,
        action: &str,
        extra: &str,
    ) -> Self {
        Self {
            timestamp,
            entity_type: entity_type.to_string(),
            entity_id,
            room: room.to_string(),
            device: String::new(),
            boredom: 0,
            fear: 0,
            action: action.to_string(),
            extra: extra.to_string(),
            provenance: Provenance::default(),
            issues: BTreeSet::new(),
        }
    }

    pub fn with_device(mut self, device: &str) -> Self {
        self.device = device.to_string();
        self
    }

    pub fn with_readings(mut self, boredom: i32, fear: i32) -> Self {
        self.boredom = boredom;
        self.fear = fear;
        self
    }

    pub fn with_provenance(mut self, source: &str, line: usize) -> Self {
        self.provenance = Provenance {
            source: source.to_string(),
            line,
        };
        self
    }

    pub fn entity_kind(&self) -> Option<EntityKind> {
        EntityKind::parse(&self.entity_type)
    }

    pub fn action_tag(&self) -> Option<Action> {
        Action::parse(&self.action)
    }

    pub fn issue_column(&self) -> String {
        let mut names: Vec<&str> = self.issues.iter().map(|issue| issue.as_str()).collect();
        names.sort_unstable();
        names.join(";")
    }

    pub fn to_row(&self, include_issues: bool) -> Vec<String> {
        let mut row = vec![
            self.timestamp.to_string(),
            self.entity_type.clone(),
            self.entity_id.to_string(),
            self.room.clone(),
            self.device.clone(),
            self.boredom.to_string(),
            self.fear.to_string(),
            self.action.clone(),
            self.extra.clone(),
        ];
        if include_issues {
            row.push(self.issue_column());
        }
        row
    }
}
