//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::paper::{SearchProvider, SearchResultItem};

/// Default number of results for a plain search
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Plain search limit bounds
pub const MIN_SEARCH_LIMIT: usize = 1;
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Default number of sources for deep research
pub const DEFAULT_DEEP_RESEARCH_LIMIT: usize = 50;
/// Deep research limit bounds
pub const MIN_DEEP_RESEARCH_LIMIT: usize = 10;
pub const MAX_DEEP_RESEARCH_LIMIT: usize = 200;

/// A federated search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub q: String,

    /// Provider to query; absent means the default provider
    pub provider: Option<SearchProvider>,

    /// Requested result count; absent means [`DEFAULT_SEARCH_LIMIT`]
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            provider: None,
            limit: None,
        }
    }

    /// Set the provider
    pub fn provider(mut self, provider: SearchProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the result limit, clamped to the public request bounds
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT));
        self
    }
}

/// Response of a federated search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Deduplicated, ranked, truncated items
    pub items: Vec<SearchResultItem>,

    /// Unique result count before truncation (fan-out searches only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_found: Option<usize>,

    /// Tags of the providers that fulfilled the request
    pub sources: Vec<String>,

    /// Wall-clock duration of the whole operation in milliseconds
    pub search_time_ms: u64,
}

/// How thorough a deep-research run should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl std::str::FromStr for ResearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(ResearchDepth::Quick),
            "standard" => Ok(ResearchDepth::Standard),
            "deep" => Ok(ResearchDepth::Deep),
            other => Err(format!("unknown research depth: {}", other)),
        }
    }
}

/// Preferred language of the research sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    En,
    #[default]
    Any,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            "any" => Ok(Language::Any),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// A deep-research request.
///
/// Deep research is a relabeling of the all-sources federated search with a
/// wider limit range; no staged progress reporting is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepResearchRequest {
    pub topic: String,

    /// Source budget; absent means [`DEFAULT_DEEP_RESEARCH_LIMIT`]
    pub max_sources: Option<usize>,

    #[serde(default)]
    pub depth: ResearchDepth,

    #[serde(default)]
    pub language: Language,
}

impl DeepResearchRequest {
    /// Create a new deep-research request
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            max_sources: None,
            depth: ResearchDepth::default(),
            language: Language::default(),
        }
    }

    /// Set the source budget, clamped to the public request bounds
    pub fn max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources =
            Some(max_sources.clamp(MIN_DEEP_RESEARCH_LIMIT, MAX_DEEP_RESEARCH_LIMIT));
        self
    }

    /// Set the research depth
    pub fn depth(mut self, depth: ResearchDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Set the preferred language
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Deep-research report returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepResearchReport {
    pub topic: String,
    pub research_depth: ResearchDepth,

    /// Count of distinct providers that actually fulfilled the search
    pub total_sources: usize,

    pub total_results: usize,
    pub sources: Vec<String>,
    pub papers: Vec<SearchResultItem>,
    pub search_time_ms: u64,
}
