//! Whole-store snapshot persistence.
//!
//! - [`SnapshotStore`]: the medium (a JSON file, or memory in tests).
//! - [`SnapshotGateway`]: load-with-merge and save-and-swallow over a medium.
//! - [`spawn_snapshot_writer`]: saves after every committed order change.

pub mod gateway;
pub mod store;
pub mod writer;

pub use gateway::{dedup_orders, merge_snapshot, SnapshotGateway};
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use writer::{apply_event, spawn_snapshot_writer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Serialization(e.to_string())
    }
}
