//! Snapshot schema and file-backed storage for resumable sessions.
//!
//! The snapshot carries body positions/velocities by name, the signed
//! simulation time, the time rate and the camera state. An empty or missing
//! state file means "no resumable session", not an error.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Snapshot data that cannot be applied to the catalog (unknown body
    /// name, non-finite numeric field). The recommended policy is to fall
    /// back to catalog defaults and surface a warning, never a crash.
    #[error("corrupt snapshot state: {0}")]
    CorruptState(String),

    #[error("state file I/O failed")]
    Io(#[from] io::Error),

    #[error("state file is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Per-body persisted state, matched to catalog bodies by `name`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub v_x: f64,
    pub v_y: f64,
}

/// A full session snapshot as stored on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub space_objects: Vec<BodySnapshot>,
    pub time: f64, // simulation seconds since the epoch, signed
    pub dt_per_s: f64, // signed
    pub zoom: f64, // in [0.3, 5.0]
    pub camera_offset: [f64; 2],
}

/// JSON file storage for one snapshot.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored snapshot. A missing or empty file yields `None`.
    pub fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Overwrite the state file with `snapshot`.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Discard any persisted session.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::write(&self.path, "") {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
