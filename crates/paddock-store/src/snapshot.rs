//! Save/load of a whole store.
//!
//! Uses bincode for compact binary snapshots and serde_json for a readable
//! export. Tables are written as plain lists and re-indexed on load.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use paddock_logic::horse::Horse;
use paddock_logic::race::{Race, RaceResult};

use crate::store::MemoryStore;

/// Version number for snapshot format (increment when format changes)
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotData {
    version: u32,
    horses: Vec<Horse>,
    races: Vec<Race>,
    results: Vec<RaceResult>,
}

impl From<&MemoryStore> for SnapshotData {
    fn from(store: &MemoryStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            horses: store.horses.values().cloned().collect(),
            races: store.races.values().cloned().collect(),
            results: store.results.clone(),
        }
    }
}

impl SnapshotData {
    fn into_store(self) -> Result<MemoryStore, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        Ok(MemoryStore {
            horses: self.horses.into_iter().map(|h| (h.id, h)).collect(),
            races: self.races.into_iter().map(|r| (r.id, r)).collect(),
            results: self.results,
        })
    }
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

impl MemoryStore {
    /// Write a binary snapshot.
    pub fn save_snapshot<W: Write>(&self, writer: W) -> Result<(), SnapshotError> {
        bincode::serialize_into(writer, &SnapshotData::from(self))?;
        Ok(())
    }

    /// Read a binary snapshot written by [`MemoryStore::save_snapshot`].
    pub fn load_snapshot<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let data: SnapshotData = bincode::deserialize_from(reader)?;
        data.into_store()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(&SnapshotData::from(self))?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let data: SnapshotData = serde_json::from_str(json)?;
        data.into_store()
    }
}
