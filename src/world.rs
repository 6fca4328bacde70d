use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::START_ROOM;

const WILLOW_ROOMS: &[(&str, &[&str])] = &[
    ("Van", &["Hallway"]),
    (
        "Hallway",
        &[
            "Van",
            "Master Bedroom",
            "Boy's Bedroom",
            "Bathroom",
            "Kitchen",
            "Basement",
        ],
    ),
    ("Master Bedroom", &["Hallway"]),
    ("Boy's Bedroom", &["Hallway"]),
    ("Bathroom", &["Hallway"]),
    ("Basement", &["Hallway", "Basement Hallway"]),
    (
        "Basement Hallway",
        &["Basement", "Right Storage Room", "Left Storage Room"],
    ),
    ("Right Storage Room", &["Basement Hallway"]),
    ("Left Storage Room", &["Basement Hallway"]),
    ("Kitchen", &["Hallway", "Living Room", "Garage"]),
    ("Living Room", &["Kitchen"]),
    ("Garage", &["Kitchen", "Utility Room"]),
    ("Utility Room", &["Garage"]),
];

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("start room '{0}' is not part of the layout")]
    UnknownStartRoom(String),
    #[error("room '{from}' lists unknown neighbor '{to}'")]
    UnknownNeighbor { from: String, to: String },
    #[error("edge {from}->{to} has no matching {to}->{from}")]
    Asymmetric { from: String, to: String },
}

#[derive(Clone, Debug, Deserialize)]
struct LayoutFile {
    #[serde(rename = "startRoom", alias = "start_room", default = "default_start_room")]
    start_room: String,
    rooms: BTreeMap<String, Vec<String>>,
}

fn default_start_room() -> String {
    START_ROOM.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HouseLayout {
    start_room: String,
    rooms: BTreeMap<String, Vec<String>>,
}

impl HouseLayout {
    pub fn willow() -> Self {
        let rooms = WILLOW_ROOMS
            .iter()
            .map(|(name, neighbors)| {
                (
                    name.to_string(),
                    neighbors.iter().map(|n| n.to_string()).collect(),
                )
            })
            .collect();
        Self {
            start_room: START_ROOM.to_string(),
            rooms,
        }
    }

    pub fn new(
        start_room: impl Into<String>,
        rooms: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, LayoutError> {
        let layout = Self {
            start_room: start_room.into(),
            rooms,
        };
        layout.check()?;
        Ok(layout)
    }

    pub fn from_json(text: &str, path: &Path) -> Result<Self, LayoutError> {
        let file: LayoutFile = serde_json::from_str(text).map_err(|source| LayoutError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file.start_room, file.rooms)
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    fn check(&self) -> Result<(), LayoutError> {
        if !self.rooms.contains_key(&self.start_room) {
            return Err(LayoutError::UnknownStartRoom(self.start_room.clone()));
        }
        for (from, neighbors) in &self.rooms {
            for to in neighbors {
                let Some(back) = self.rooms.get(to) else {
                    return Err(LayoutError::UnknownNeighbor {
                        from: from.clone(),
                        to: to.clone(),
                    });
                };
                if !back.contains(from) {
                    return Err(LayoutError::Asymmetric {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn start_room(&self) -> &str {
        &self.start_room
    }

    pub fn contains(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn neighbors(&self, room: &str) -> &[String] {
        self.rooms.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_neighbor(&self, from: &str, to: &str) -> bool {
        self.neighbors(from).iter().any(|room| room == to)
    }

    pub fn room_names(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }
}
