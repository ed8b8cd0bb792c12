//! Best-time records.
//!
//! A [`PlayerTable`] maps player names to their best [`PlayerData`]. The
//! [`RecordStore`] persists the table as a TOML document of the form
//!
//! ```toml
//! [[PlayerList.PlayerData]]
//! PlayerName = "ALICE"
//! GameTime = 120.5
//! ```
//!
//! A records file that is absent or cannot be parsed yields an empty table.
//! A file that parses but lacks the `PlayerList` root, or a record that lacks
//! one of its fields, is a [`LoadError::Schema`].

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerData {
    pub name: String,
    /// Seconds taken to find every hidden object.
    pub game_time: f32,
}

impl PlayerData {
    pub fn new(name: impl Into<String>, game_time: f32) -> Self {
        Self {
            name: name.into(),
            game_time,
        }
    }
}

/// Player records ordered by name. Holds at most one entry per name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerTable {
    players: BTreeMap<String, PlayerData>,
}

impl PlayerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `player` into the table. An existing entry is only replaced by a
    /// strictly lower time. Returns whether the table changed.
    pub fn insert(&mut self, player: PlayerData) -> bool {
        match self.players.get_mut(&player.name) {
            Some(existing) if player.game_time < existing.game_time => {
                existing.game_time = player.game_time;
                true
            }
            Some(_) => false,
            None => {
                self.players.insert(player.name.clone(), player);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PlayerData> {
        self.players.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerData> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Render the table as a records document.
    pub fn to_document(&self) -> anyhow::Result<String> {
        let document = RecordsDocument {
            player_list: PlayerList {
                players: self
                    .iter()
                    .map(|p| PlayerRecord {
                        name: p.name.clone(),
                        game_time: p.game_time,
                    })
                    .collect(),
            },
        };
        Ok(toml::to_string(&document)?)
    }

    /// Parse a records document. `source` only labels errors.
    pub fn from_document(text: &str, source: &Path) -> Result<Self, LoadError> {
        let value: toml::Table = text.parse().map_err(|e| LoadError::Syntax {
            path: source.to_path_buf(),
            source: e,
        })?;
        let document: RecordsDocument =
            toml::Value::Table(value)
                .try_into()
                .map_err(|e| LoadError::Schema {
                    path: source.to_path_buf(),
                    source: e,
                })?;
        let mut table = Self::new();
        for record in document.player_list.players {
            table.insert(PlayerData::new(record.name, record.game_time));
        }
        Ok(table)
    }
}

/// Format seconds as `hh:mm:ss`. Minutes and seconds are two digits wide,
/// hours grow as needed.
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[derive(Serialize, Deserialize)]
struct RecordsDocument {
    #[serde(rename = "PlayerList")]
    player_list: PlayerList,
}

#[derive(Serialize, Deserialize)]
struct PlayerList {
    #[serde(rename = "PlayerData", default)]
    players: Vec<PlayerRecord>,
}

#[derive(Serialize, Deserialize)]
struct PlayerRecord {
    #[serde(rename = "PlayerName")]
    name: String,
    #[serde(rename = "GameTime")]
    game_time: f32,
}

/// Reads and writes the records document at a fixed path.
#[derive(Clone, Debug)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored table.
    ///
    /// Unreadable and malformed files are logged and produce an empty table;
    /// only schema violations are returned as errors.
    pub fn load(&self) -> Result<PlayerTable, LoadError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "No player records loaded from {}: {}",
                    self.path.display(),
                    e
                );
                return Ok(PlayerTable::new());
            }
        };
        match PlayerTable::from_document(&text, &self.path) {
            Err(LoadError::Syntax { path, source }) => {
                log::warn!("Ignoring malformed records {}: {}", path.display(), source);
                Ok(PlayerTable::new())
            }
            result => {
                if let Ok(table) = &result {
                    log::info!(
                        "Loaded {} player records from {}",
                        table.len(),
                        self.path.display()
                    );
                }
                result
            }
        }
    }

    pub fn save(&self, table: &PlayerTable) -> anyhow::Result<()> {
        let document = table.to_document()?;
        std::fs::write(&self.path, document)
            .with_context(|| format!("writing {}", self.path.display()))?;
        log::info!(
            "Saved {} player records to {}",
            table.len(),
            self.path.display()
        );
        Ok(())
    }
}
