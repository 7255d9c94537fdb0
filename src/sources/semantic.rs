//! Semantic Scholar provider client.
//!
//! This is the primary provider: unlike its siblings it never surfaces a
//! failure, falling back to placeholder results so the default search path
//! always has something to return.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

use crate::federation::placeholder_results;
use crate::models::{CachedPaper, SearchProvider, SearchResultItem};
use crate::sources::{spawn_cache_write, ProviderClient, ProviderError};
use crate::store::PaperStore;
use crate::utils::HttpClient;

const SEMANTIC_API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Fields requested from the paper search endpoint
const SEARCH_FIELDS: &str =
    "title,abstract,authors,url,year,externalIds,citationCount,referenceCount,fieldsOfStudy";

/// Semantic Scholar provider client
#[derive(Debug, Clone)]
pub struct SemanticScholarClient {
    client: Arc<HttpClient>,
    store: Arc<dyn PaperStore>,
    base_url: String,
}

impl SemanticScholarClient {
    /// Create a new Semantic Scholar client
    pub fn new(client: Arc<HttpClient>, store: Arc<dyn PaperStore>) -> Self {
        Self {
            client,
            store,
            base_url: SEMANTIC_API_URL.to_string(),
        }
    }

    /// Create a client against a custom endpoint (for testing)
    #[allow(dead_code)]
    pub fn with_base_url(
        client: Arc<HttpClient>,
        store: Arc<dyn PaperStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            base_url: base_url.into(),
        }
    }

    async fn fetch(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let url = format!(
            "{}?query={}&limit={}&fields={}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            SEARCH_FIELDS
        );

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimit);
        }
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "Semantic Scholar returned status: {}",
                response.status()
            )));
        }

        let data: S2SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Semantic Scholar JSON: {}", e)))?;

        let mut items = Vec::new();
        let mut cached = Vec::new();

        for raw in data.data {
            let paper: S2Paper = match serde_json::from_value(raw.clone()) {
                Ok(paper) => paper,
                Err(e) => {
                    tracing::warn!("skipping malformed Semantic Scholar record: {}", e);
                    continue;
                }
            };

            let item = SearchResultItem {
                id: paper.paper_id.unwrap_or_default(),
                source: SearchProvider::SemanticScholar,
                title: paper.title.unwrap_or_default(),
                authors: paper.authors.into_iter().filter_map(|a| a.name).collect(),
                r#abstract: paper.r#abstract,
                url: paper.url,
                year: paper.year,
            };

            // the raw provider record goes into the cache for later lookup
            cached.push(CachedPaper::from_item(&item, raw));
            items.push(item);
        }

        spawn_cache_write(Arc::clone(&self.store), cached);

        Ok(items)
    }
}

#[async_trait]
impl ProviderClient for SemanticScholarClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::SemanticScholar
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        match self.fetch(query, limit).await {
            Ok(items) => Ok(items),
            Err(ProviderError::RateLimit) => {
                tracing::warn!(
                    "rate limit exceeded for Semantic Scholar, serving placeholder results"
                );
                Ok(placeholder_results(query, limit))
            }
            Err(e) => {
                tracing::error!("error searching Semantic Scholar: {}", e);
                Ok(placeholder_results(query, limit))
            }
        }
    }
}

// ===== Semantic Scholar API types =====

#[derive(Debug, Deserialize)]
struct S2SearchResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct S2Paper {
    #[serde(rename = "paperId")]
    paper_id: Option<String>,
    title: Option<String>,
    r#abstract: Option<String>,
    #[serde(default)]
    authors: Vec<S2Author>,
    url: Option<String>,
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}
