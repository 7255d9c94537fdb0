//! File-backed store implementation.
//!
//! # Store structure
//!
//! ```text
//! <data_dir>/
//!   papers/
//!     <md5(external_id)>.json
//!   summaries/
//!     <input_hash>.json
//! ```
//!
//! External IDs contain `/`, `:` and URL characters, so paper file names
//! are the md5 of the ID rather than the ID itself. Summary hashes are
//! already hex and used as-is.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{PaperStore, StoreError, SummaryStore};
use crate::models::{CachedPaper, SummaryRecord};

/// File-backed implementation of [`PaperStore`] and [`SummaryStore`]
#[derive(Debug, Clone)]
pub struct FsStore {
    papers_dir: PathBuf,
    summaries_dir: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `base_dir`, creating the layout on demand
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        let papers_dir = base_dir.join("papers");
        let summaries_dir = base_dir.join("summaries");

        fs::create_dir_all(&papers_dir)?;
        fs::create_dir_all(&summaries_dir)?;
        tracing::debug!("store initialized at: {}", base_dir.display());

        Ok(Self {
            papers_dir,
            summaries_dir,
        })
    }

    fn paper_path(&self, external_id: &str) -> PathBuf {
        let digest = md5::compute(external_id.as_bytes());
        self.papers_dir.join(format!("{:x}.json", digest))
    }

    fn summary_path(&self, input_hash: &str) -> PathBuf {
        self.summaries_dir.join(format!("{}.json", input_hash))
    }

    fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(record)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[async_trait]
impl PaperStore for FsStore {
    async fn upsert_paper(&self, paper: &CachedPaper) -> Result<(), StoreError> {
        Self::write_record(&self.paper_path(&paper.external_id), paper)
    }

    async fn get_paper(&self, external_id: &str) -> Result<Option<CachedPaper>, StoreError> {
        Self::read_record(&self.paper_path(external_id))
    }
}

#[async_trait]
impl SummaryStore for FsStore {
    async fn insert_summary(&self, record: &SummaryRecord) -> Result<(), StoreError> {
        let path = self.summary_path(&record.input_hash);
        let content = serde_json::to_string_pretty(record)?;

        // create_new enforces the unique-hash constraint atomically
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Conflict(record.input_hash.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(content.as_bytes())?;
        Ok(())
    }

    async fn get_summary(&self, input_hash: &str) -> Result<Option<SummaryRecord>, StoreError> {
        Self::read_record(&self.summary_path(input_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchProvider, SearchResultItem};
    use chrono::Utc;
    use tempfile::TempDir;

    fn item(id: &str, source: SearchProvider, title: &str) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            source,
            title: title.to_string(),
            authors: vec![],
            r#abstract: None,
            url: None,
            year: None,
        }
    }

    fn record(hash: &str, summary: &str) -> SummaryRecord {
        SummaryRecord {
            user_id: "user-1".to_string(),
            paper_id: None,
            source: "text".to_string(),
            input_hash: hash.to_string(),
            summary: summary.to_string(),
            key_ideas: vec!["idea".to_string()],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_paper_upsert_and_lookup() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path()).unwrap();

        let paper = CachedPaper::from_item(
            &item("pubmed:12345", SearchProvider::Pubmed, "A Study"),
            serde_json::json!({}),
        );
        store.upsert_paper(&paper).await.unwrap();

        let found = store.get_paper("pubmed:12345").await.unwrap().unwrap();
        assert_eq!(found.title, "A Study");
        assert!(store.get_paper("pubmed:99999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_paper_upsert_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path()).unwrap();

        let first = CachedPaper::from_item(
            &item("2301.12345v1", SearchProvider::Arxiv, "Old Title"),
            serde_json::json!({}),
        );
        let second = CachedPaper::from_item(
            &item("2301.12345v1", SearchProvider::Arxiv, "New Title"),
            serde_json::json!({}),
        );

        store.upsert_paper(&first).await.unwrap();
        store.upsert_paper(&second).await.unwrap();

        let found = store.get_paper("2301.12345v1").await.unwrap().unwrap();
        assert_eq!(found.title, "New Title");
    }

    // Keys carry no provider namespace, so the same raw ID from two
    // providers collides and the later write wins. That is the documented
    // keying weakness; this test pins it so it cannot change silently.
    #[tokio::test]
    async fn test_cross_provider_collision_last_write_wins() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path()).unwrap();

        let from_semantic = CachedPaper::from_item(
            &item("abc123", SearchProvider::SemanticScholar, "Semantic Copy"),
            serde_json::json!({}),
        );
        let from_crossref = CachedPaper::from_item(
            &item("abc123", SearchProvider::Crossref, "CrossRef Copy"),
            serde_json::json!({}),
        );

        store.upsert_paper(&from_semantic).await.unwrap();
        store.upsert_paper(&from_crossref).await.unwrap();

        let found = store.get_paper("abc123").await.unwrap().unwrap();
        assert_eq!(found.source, SearchProvider::Crossref);
        assert_eq!(found.title, "CrossRef Copy");
    }

    #[tokio::test]
    async fn test_summary_insert_conflict() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path()).unwrap();

        store.insert_summary(&record("hash-1", "first")).await.unwrap();

        let err = store
            .insert_summary(&record("hash-1", "second"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // the original record survives the conflicting insert
        let found = store.get_summary("hash-1").await.unwrap().unwrap();
        assert_eq!(found.summary, "first");
    }

    #[tokio::test]
    async fn test_summary_lookup_missing() {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path()).unwrap();

        assert!(store.get_summary("nope").await.unwrap().is_none());
    }
}
