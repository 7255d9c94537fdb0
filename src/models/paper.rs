//! Normalized paper records and provider tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The search provider a result came from (or is requested from).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProvider {
    #[default]
    SemanticScholar,
    Arxiv,
    Pubmed,
    GoogleScholar,
    Crossref,
    WebSearch,
    /// Fan the query out to every real provider
    AllSources,
}

impl SearchProvider {
    /// The wire tag for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchProvider::SemanticScholar => "semantic_scholar",
            SearchProvider::Arxiv => "arxiv",
            SearchProvider::Pubmed => "pubmed",
            SearchProvider::GoogleScholar => "google_scholar",
            SearchProvider::Crossref => "crossref",
            SearchProvider::WebSearch => "web_search",
            SearchProvider::AllSources => "all_sources",
        }
    }
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SearchProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semantic_scholar" => Ok(SearchProvider::SemanticScholar),
            "arxiv" => Ok(SearchProvider::Arxiv),
            "pubmed" => Ok(SearchProvider::Pubmed),
            "google_scholar" => Ok(SearchProvider::GoogleScholar),
            "crossref" => Ok(SearchProvider::Crossref),
            "web_search" => Ok(SearchProvider::WebSearch),
            "all_sources" => Ok(SearchProvider::AllSources),
            other => Err(format!("unknown search provider: {}", other)),
        }
    }
}

/// A normalized paper record from any provider.
///
/// The `id` is provider-scoped: uniqueness is only guaranteed within a
/// single provider, not globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Provider-scoped external identifier (DOI, PMID, arXiv ID, ...)
    pub id: String,

    /// Provider that produced this item
    pub source: SearchProvider,

    /// Paper title; may be empty on malformed provider responses
    pub title: String,

    /// Author display names, in provider-supplied order
    pub authors: Vec<String>,

    /// Abstract text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<String>,

    /// Paper page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Publication year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Persisted mirror of a search result plus the raw provider payload.
///
/// Keyed by the raw external `id` alone. Cross-provider ID collisions are
/// a known weakness of this keying and are deliberately preserved; see the
/// store tests pinning that behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPaper {
    pub external_id: String,
    pub source: SearchProvider,
    pub title: String,
    pub authors: Vec<String>,
    pub r#abstract: Option<String>,
    pub url: Option<String>,
    pub year: Option<i32>,

    /// Raw provider payload, kept for later retrieval by the summarizer
    pub raw: serde_json::Value,

    pub cached_at: DateTime<Utc>,
}

impl CachedPaper {
    /// Build a cache record from a normalized item and its raw payload
    pub fn from_item(item: &SearchResultItem, raw: serde_json::Value) -> Self {
        Self {
            external_id: item.id.clone(),
            source: item.source,
            title: item.title.clone(),
            authors: item.authors.clone(),
            r#abstract: item.r#abstract.clone(),
            url: item.url.clone(),
            year: item.year,
            raw,
            cached_at: Utc::now(),
        }
    }
}
