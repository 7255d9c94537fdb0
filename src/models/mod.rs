//! Core data structures shared across the library.

mod paper;
mod search;
mod summary;

pub use paper::{CachedPaper, SearchProvider, SearchResultItem};
pub use search::{
    DeepResearchReport, DeepResearchRequest, Language, ResearchDepth, SearchRequest,
    SearchResponse, DEFAULT_DEEP_RESEARCH_LIMIT, DEFAULT_SEARCH_LIMIT,
};
pub use summary::{
    AnalyzePaperRequest, AnalyzedPaper, RelatedPaper, SummarizeRequest, SummaryRecord,
    SummaryResponse,
};
