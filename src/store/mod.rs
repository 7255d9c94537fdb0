//! Persistence contracts for cached papers and summaries.
//!
//! The store is an external collaborator with a deliberately narrow
//! contract: last-write-wins upserts keyed by raw external ID for papers,
//! and unique-constrained inserts keyed by content hash for summaries.
//! [`FsStore`] is the file-backed implementation used by the binary; tests
//! may supply their own implementations of the traits.

mod fs;

pub use fs::FsStore;

use async_trait::async_trait;

use crate::models::{CachedPaper, SummaryRecord};

/// Errors that can occur when talking to the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique-keyed record already exists
    #[error("record already exists: {0}")]
    Conflict(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value store for provider paper records.
///
/// Records are keyed by the raw external ID without provider namespacing;
/// upserts are last-write-wins and the upsert primitive is atomic per key,
/// so overlapping writes for the same ID need no extra coordination.
#[async_trait]
pub trait PaperStore: Send + Sync + std::fmt::Debug {
    /// Create or overwrite the record for `paper.external_id`
    async fn upsert_paper(&self, paper: &CachedPaper) -> Result<(), StoreError>;

    /// Look up a record by its external ID
    async fn get_paper(&self, external_id: &str) -> Result<Option<CachedPaper>, StoreError>;
}

/// Unique-constrained store for generated summaries.
#[async_trait]
pub trait SummaryStore: Send + Sync + std::fmt::Debug {
    /// Insert a new summary; fails with [`StoreError::Conflict`] when a
    /// record with the same `input_hash` already exists
    async fn insert_summary(&self, record: &SummaryRecord) -> Result<(), StoreError>;

    /// Look up a summary by its content hash
    async fn get_summary(&self, input_hash: &str) -> Result<Option<SummaryRecord>, StoreError>;
}
