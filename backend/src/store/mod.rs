//! Event store collaborator
//!
//! Raw bloom, abortion and harvest entries live in an injected store with
//! per-entry append semantics. Each write touches exactly one entry, so two
//! near-simultaneous submissions cannot overwrite each other's collection.

mod memory;
mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The three persisted entry collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Blooms,
    Abortions,
    Harvests,
}

impl Collection {
    /// Storage key of the collection
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Blooms => "bloom_entries",
            Collection::Abortions => "abortion_entries",
            Collection::Harvests => "harvest_entries",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One persisted entry as the store sees it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub id: Uuid,
    pub payload: serde_json::Value,
}

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Entry {id} not found in {collection}")]
    EntryNotFound { collection: Collection, id: Uuid },

    #[error("Entry id {id} is already taken, cannot append to {collection}")]
    DuplicateEntry { collection: Collection, id: Uuid },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Interface for entry persistence.
///
/// Implementations:
/// - `MemoryEventStore`: process-local, used for offline runs and tests
/// - `PgEventStore`: PostgreSQL, one JSONB row per entry
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Short name reported by the health endpoint
    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> StoreResult<()>;

    /// Every entry of a collection, in insertion order
    async fn load(&self, collection: Collection) -> StoreResult<Vec<StoredEntry>>;

    /// Add a new entry; fails if the id is already present in any collection
    async fn append(&self, collection: Collection, entry: StoredEntry) -> StoreResult<()>;

    /// Replace an existing entry in place, keeping its position
    async fn rewrite(&self, collection: Collection, entry: StoredEntry) -> StoreResult<()>;

    async fn remove(&self, collection: Collection, id: Uuid) -> StoreResult<()>;

    async fn load_settings(&self) -> StoreResult<Option<serde_json::Value>>;

    async fn save_settings(&self, settings: serde_json::Value) -> StoreResult<()>;
}
