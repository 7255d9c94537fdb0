//! Federated search across all provider clients.
//!
//! The orchestrator fans a query out to every provider at once, joins the
//! outcomes without letting one failure cancel its siblings, deduplicates
//! by title, ranks by a fixed relevance heuristic and truncates to the
//! requested limit. Search is designed to always return *something*: when
//! every provider fails, placeholder results stand in for real ones.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::models::{
    DeepResearchReport, DeepResearchRequest, SearchProvider, SearchRequest, SearchResponse,
    SearchResultItem, DEFAULT_DEEP_RESEARCH_LIMIT, DEFAULT_SEARCH_LIMIT,
};
use crate::sources::{
    ArxivClient, CrossRefClient, ProviderClient, PubMedClient, SemanticScholarClient,
    WebSearchClient,
};
use crate::store::PaperStore;
use crate::utils::HttpClient;

/// Number of real providers the fan-out limit is split across
const FANOUT_PROVIDERS: usize = 4;

/// Title-token hits weigh twice as much as abstract hits
const TITLE_TOKEN_WEIGHT: f64 = 2.0;
const ABSTRACT_TOKEN_WEIGHT: f64 = 1.0;

/// Recency bonus per year relative to the pivot year; negative for older
/// papers
const RECENCY_PIVOT_YEAR: i32 = 2020;
const RECENCY_WEIGHT: f64 = 0.1;

/// Federated search orchestrator
#[derive(Debug, Clone)]
pub struct FederatedSearch {
    semantic: Arc<dyn ProviderClient>,
    arxiv: Arc<dyn ProviderClient>,
    pubmed: Arc<dyn ProviderClient>,
    crossref: Arc<dyn ProviderClient>,
    web: Arc<dyn ProviderClient>,
}

impl FederatedSearch {
    /// Create an orchestrator over explicit provider clients
    pub fn new(
        semantic: Arc<dyn ProviderClient>,
        arxiv: Arc<dyn ProviderClient>,
        pubmed: Arc<dyn ProviderClient>,
        crossref: Arc<dyn ProviderClient>,
        web: Arc<dyn ProviderClient>,
    ) -> Self {
        Self {
            semantic,
            arxiv,
            pubmed,
            crossref,
            web,
        }
    }

    /// Create an orchestrator wired to the real provider clients
    pub fn with_defaults(client: Arc<HttpClient>, store: Arc<dyn PaperStore>) -> Self {
        Self::new(
            Arc::new(SemanticScholarClient::new(
                Arc::clone(&client),
                Arc::clone(&store),
            )),
            Arc::new(ArxivClient::new(Arc::clone(&client), Arc::clone(&store))),
            Arc::new(PubMedClient::new(Arc::clone(&client), Arc::clone(&store))),
            Arc::new(CrossRefClient::new(client, store)),
            Arc::new(WebSearchClient::new()),
        )
    }

    /// Run a federated search. Never fails: provider errors degrade to
    /// partial or placeholder results.
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let started = Instant::now();
        let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let provider = request.provider.unwrap_or_default();

        let outcome = match provider {
            SearchProvider::AllSources => self.search_all_sources(&request.q, limit).await,
            single => self.search_single(single, &request.q, limit).await,
        };

        SearchResponse {
            items: outcome.items,
            total_found: outcome.total_found,
            sources: outcome.sources,
            search_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Deep research is a relabeling of the all-sources search with a
    /// wider limit range; the internal request bypasses the plain-search
    /// limit bounds on purpose.
    pub async fn deep_research(&self, request: &DeepResearchRequest) -> DeepResearchReport {
        let max_sources = request.max_sources.unwrap_or(DEFAULT_DEEP_RESEARCH_LIMIT);

        let search_request = SearchRequest {
            q: request.topic.clone(),
            provider: Some(SearchProvider::AllSources),
            limit: Some(max_sources),
        };
        let response = self.search(&search_request).await;

        DeepResearchReport {
            topic: request.topic.clone(),
            research_depth: request.depth,
            total_sources: response.sources.len(),
            total_results: response.items.len(),
            sources: response.sources,
            papers: response.items,
            search_time_ms: response.search_time_ms,
        }
    }

    async fn search_all_sources(&self, query: &str, limit: usize) -> Outcome {
        let per_source_limit = limit.div_ceil(FANOUT_PROVIDERS);

        let fanout = [
            (SearchProvider::SemanticScholar, Arc::clone(&self.semantic)),
            (SearchProvider::Arxiv, Arc::clone(&self.arxiv)),
            (SearchProvider::Pubmed, Arc::clone(&self.pubmed)),
            (SearchProvider::Crossref, Arc::clone(&self.crossref)),
            (SearchProvider::WebSearch, Arc::clone(&self.web)),
        ];

        // settle-all join: every provider runs to completion and a failed
        // provider never cancels its siblings
        let outcomes = join_all(fanout.into_iter().map(|(tag, client)| async move {
            (tag, client.search(query, per_source_limit).await)
        }))
        .await;

        let mut merged = Vec::new();
        let mut sources = Vec::new();

        for (tag, outcome) in outcomes {
            // the web stub runs with the others, but its outcome is kept
            // out of the merge and the sources bookkeeping
            if tag == SearchProvider::WebSearch {
                continue;
            }

            match outcome {
                Ok(items) => {
                    merged.extend(items);
                    sources.push(tag.as_str().to_string());
                }
                Err(e) => {
                    tracing::warn!(provider = tag.as_str(), "provider search failed: {}", e);
                }
            }
        }

        if sources.is_empty() {
            tracing::error!("all providers failed, serving placeholder results");
            return Outcome {
                items: placeholder_results(query, limit),
                total_found: None,
                sources: Vec::new(),
            };
        }

        let unique = dedupe_by_title(merged);
        let total_found = unique.len();
        let ranked = rank_by_relevance(unique, query);

        Outcome {
            items: ranked.into_iter().take(limit).collect(),
            total_found: Some(total_found),
            sources,
        }
    }

    async fn search_single(&self, provider: SearchProvider, query: &str, limit: usize) -> Outcome {
        let client = self.client_for(provider);
        let sources = vec![provider.as_str().to_string()];

        match client.search(query, limit).await {
            Ok(items) => Outcome {
                items,
                total_found: None,
                sources,
            },
            Err(e) => {
                tracing::error!(provider = provider.as_str(), "provider search failed: {}", e);
                Outcome {
                    items: Vec::new(),
                    total_found: None,
                    sources,
                }
            }
        }
    }

    /// Resolve the client for a single-provider search; unmapped tags
    /// (including `google_scholar`) fall back to the default provider
    fn client_for(&self, provider: SearchProvider) -> &Arc<dyn ProviderClient> {
        match provider {
            SearchProvider::Arxiv => &self.arxiv,
            SearchProvider::Pubmed => &self.pubmed,
            SearchProvider::Crossref => &self.crossref,
            SearchProvider::WebSearch => &self.web,
            _ => &self.semantic,
        }
    }
}

struct Outcome {
    items: Vec<SearchResultItem>,
    total_found: Option<usize>,
    sources: Vec<String>,
}

/// Drop items whose title matches an earlier one, ignoring case and
/// surrounding whitespace. First occurrence wins; order is preserved.
fn dedupe_by_title(items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.title.trim().to_lowercase()))
        .collect()
}

/// Sort items by descending relevance to the query.
///
/// Each whitespace-delimited lowercase query token contributes 2 points
/// when it is a substring of the lowercased title and 1 point when it is a
/// substring of the lowercased abstract; items with a known year get a
/// recency bonus of `(year - 2020) * 0.1`. Tie order is unspecified.
fn rank_by_relevance(items: Vec<SearchResultItem>, query: &str) -> Vec<SearchResultItem> {
    let tokens: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut scored: Vec<(f64, SearchResultItem)> = items
        .into_iter()
        .map(|item| (relevance_score(&item, &tokens), item))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

fn relevance_score(item: &SearchResultItem, tokens: &[String]) -> f64 {
    let title = item.title.to_lowercase();
    let abstract_text = item.r#abstract.as_deref().map(str::to_lowercase);

    let mut score = 0.0;
    for token in tokens {
        if title.contains(token.as_str()) {
            score += TITLE_TOKEN_WEIGHT;
        }
        if let Some(text) = &abstract_text {
            if text.contains(token.as_str()) {
                score += ABSTRACT_TOKEN_WEIGHT;
            }
        }
    }

    if let Some(year) = item.year {
        score += f64::from(year - RECENCY_PIVOT_YEAR) * RECENCY_WEIGHT;
    }

    score
}

/// Synthesized results served when real providers have nothing to offer.
///
/// The templates interpolate the query and are tagged as the primary
/// provider; callers must tolerate clearly-synthetic content.
pub fn placeholder_results(query: &str, limit: usize) -> Vec<SearchResultItem> {
    let papers = vec![
        SearchResultItem {
            id: "placeholder-1".to_string(),
            source: SearchProvider::SemanticScholar,
            title: format!("Comprehensive Survey of {} Applications", query),
            authors: vec!["Alice Johnson".to_string(), "Bob Smith".to_string()],
            r#abstract: Some(format!(
                "This comprehensive survey explores the current state of {} research, \
                 examining key methodologies, challenges, and future directions. We analyze \
                 over 100 recent publications to provide insights into emerging trends and \
                 opportunities in this rapidly evolving field.",
                query
            )),
            url: Some("https://example.com/paper1".to_string()),
            year: Some(2023),
        },
        SearchResultItem {
            id: "placeholder-2".to_string(),
            source: SearchProvider::SemanticScholar,
            title: format!("Deep Learning Approaches to {}", query),
            authors: vec!["Carol Davis".to_string(), "David Wilson".to_string()],
            r#abstract: Some(format!(
                "Recent advances in deep learning have shown promising results in {}. This \
                 review covers the latest developments, challenges, and opportunities in \
                 applying neural networks to this domain.",
                query
            )),
            url: Some("https://example.com/paper2".to_string()),
            year: Some(2024),
        },
        SearchResultItem {
            id: "placeholder-3".to_string(),
            source: SearchProvider::SemanticScholar,
            title: format!("Statistical Analysis of {} Patterns", query),
            authors: vec!["Charlie Brown".to_string(), "Diana Prince".to_string()],
            r#abstract: Some(format!(
                "We present a statistical framework for analyzing patterns in {}. Our \
                 methodology combines classical statistical approaches with modern \
                 computational techniques to provide robust analysis tools.",
                query
            )),
            url: Some("https://example.com/paper3".to_string()),
            year: Some(2022),
        },
    ];

    papers.into_iter().take(limit).collect()
}
