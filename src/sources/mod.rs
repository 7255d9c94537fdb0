//! Provider clients for the external academic-paper APIs.
//!
//! Each client implements the [`ProviderClient`] trait: it converts a
//! free-text query and a result limit into a normalized list of
//! [`SearchResultItem`]s, translating the provider's own pagination, error
//! and payload conventions along the way. Clients persist every
//! successfully normalized item into the paper store as a detached
//! best-effort write; a failed write is logged and never fails the search.

mod arxiv;
mod crossref;
mod pubmed;
mod semantic;
mod web;

pub mod mock;

pub use arxiv::ArxivClient;
pub use crossref::CrossRefClient;
pub use mock::MockProvider;
pub use pubmed::PubMedClient;
pub use semantic::SemanticScholarClient;
pub use web::WebSearchClient;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{CachedPaper, SearchProvider, SearchResultItem};
use crate::store::PaperStore;

/// Contract implemented by every provider client.
#[async_trait]
pub trait ProviderClient: Send + Sync + std::fmt::Debug {
    /// Tag of the provider this client talks to
    fn provider(&self) -> SearchProvider;

    /// Search for papers matching the query.
    ///
    /// Providers may return fewer than `limit` items. Failures are
    /// surfaced to the orchestrator, which logs and degrades them; they
    /// never propagate beyond it.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError>;
}

/// Errors that can occur when talking to a provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network or transport error
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the provider
    #[error("API error: {0}")]
    Api(String),

    /// Malformed provider payload (JSON, XML, ...)
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP 429 from the provider
    #[error("rate limit exceeded")]
    RateLimit,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::DeError> for ProviderError {
    fn from(err: quick_xml::DeError) -> Self {
        ProviderError::Parse(format!("XML: {}", err))
    }
}

/// Persist provider records off the critical path.
///
/// The write is a detached task: it is never joined into the caller's
/// result, and each failed upsert is only observed via logging.
pub(crate) fn spawn_cache_write(store: Arc<dyn PaperStore>, papers: Vec<CachedPaper>) {
    if papers.is_empty() {
        return;
    }

    tokio::spawn(async move {
        for paper in papers {
            if let Err(e) = store.upsert_paper(&paper).await {
                tracing::warn!(
                    external_id = %paper.external_id,
                    "failed to cache search result: {}",
                    e
                );
            }
        }
    });
}
