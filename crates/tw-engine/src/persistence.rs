//! Saving and restoring whole-world snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tw_core::World;
use uuid::Uuid;

use crate::error::PersistenceError;

/// An encoded copy of the world at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unique snapshot identifier.
    pub id: Uuid,
    /// When the snapshot was captured.
    pub captured_at: DateTime<Utc>,
    /// Move counter at capture time.
    pub moves: u64,
    /// Score at capture time.
    pub score: i64,
    /// The encoded world.
    pub bytes: Vec<u8>,
}

/// Stores and recovers world snapshots.
pub trait Persistence: std::fmt::Debug {
    /// Capture the world. Returns the stored snapshot.
    fn capture(&mut self, world: &World) -> Result<&Snapshot, PersistenceError>;

    /// The most recently captured snapshot.
    fn latest(&self) -> Option<&Snapshot>;

    /// Decode a snapshot back into a world.
    fn restore(&self, snapshot: &Snapshot) -> Result<World, PersistenceError>;
}

/// In-memory persistence using the world's JSON encoding.
#[derive(Debug, Default)]
pub struct JsonPersistence {
    snapshots: Vec<Snapshot>,
    max_snapshots: usize,
}

impl JsonPersistence {
    /// Create an empty store keeping every snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most this many snapshots (0 = unlimited).
    pub fn with_max_snapshots(mut self, max: usize) -> Self {
        self.max_snapshots = max;
        self
    }

    /// All stored snapshots, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Find a snapshot by id.
    pub fn get(&self, id: Uuid) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }
}

impl Persistence for JsonPersistence {
    fn capture(&mut self, world: &World) -> Result<&Snapshot, PersistenceError> {
        let snapshot = Snapshot {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            moves: world.moves(),
            score: world.score(),
            bytes: world.to_json()?,
        };
        debug!(
            id = %snapshot.id,
            moves = snapshot.moves,
            bytes = snapshot.bytes.len(),
            "snapshot_captured"
        );
        self.snapshots.push(snapshot);
        if self.max_snapshots > 0 && self.snapshots.len() > self.max_snapshots {
            let overflow = self.snapshots.len() - self.max_snapshots;
            self.snapshots.drain(..overflow);
        }
        self.snapshots.last().ok_or(PersistenceError::NoSnapshot)
    }

    fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    fn restore(&self, snapshot: &Snapshot) -> Result<World, PersistenceError> {
        Ok(World::from_json(&snapshot.bytes)?)
    }
}
