//! PubMed provider client using the NCBI E-utilities API.
//!
//! Searching is a two-step flow: `esearch` resolves the query to a list of
//! PubMed IDs, `esummary` resolves those IDs to article records.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{CachedPaper, SearchProvider, SearchResultItem};
use crate::sources::{spawn_cache_write, ProviderClient, ProviderError};
use crate::store::PaperStore;
use crate::utils::{extract_year, HttpClient};

const PUBMED_ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const PUBMED_ESUMMARY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";

/// PubMed provider client
#[derive(Debug, Clone)]
pub struct PubMedClient {
    client: Arc<HttpClient>,
    store: Arc<dyn PaperStore>,
}

impl PubMedClient {
    /// Create a new PubMed client
    pub fn new(client: Arc<HttpClient>, store: Arc<dyn PaperStore>) -> Self {
        Self { client, store }
    }

    /// Normalize one esummary article into an item
    fn to_item(id: &str, article: PubmedArticle) -> SearchResultItem {
        SearchResultItem {
            id: format!("pubmed:{}", id),
            source: SearchProvider::Pubmed,
            title: article.title.unwrap_or_default(),
            authors: article
                .authors
                .into_iter()
                .filter_map(|author| author.name)
                .collect(),
            r#abstract: article.r#abstract,
            url: Some(format!("https://pubmed.ncbi.nlm.nih.gov/{}/", id)),
            year: article.pubdate.as_deref().and_then(extract_year),
        }
    }
}

#[async_trait]
impl ProviderClient for PubMedClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Pubmed
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let search_url = format!(
            "{}?db=pubmed&term={}&retmax={}&retmode=json",
            PUBMED_ESEARCH_URL,
            urlencoding::encode(query),
            limit
        );

        let search_response = self.client.get(&search_url).send().await?;
        if !search_response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "PubMed esearch returned status: {}",
                search_response.status()
            )));
        }

        let search_data: EsearchResponse = search_response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("PubMed esearch JSON: {}", e)))?;

        let ids = search_data
            .esearchresult
            .map(|result| result.idlist)
            .unwrap_or_default();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let summary_url = format!(
            "{}?db=pubmed&id={}&retmode=json",
            PUBMED_ESUMMARY_URL,
            ids.join(",")
        );

        let summary_response = self.client.get(&summary_url).send().await?;
        if !summary_response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "PubMed esummary returned status: {}",
                summary_response.status()
            )));
        }

        let summary_data: EsummaryResponse = summary_response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("PubMed esummary JSON: {}", e)))?;

        let articles = summary_data.result.unwrap_or_default();

        let mut items = Vec::new();
        for id in &ids {
            let Some(raw) = articles.get(id) else {
                continue;
            };
            match serde_json::from_value::<PubmedArticle>(raw.clone()) {
                Ok(article) => items.push(Self::to_item(id, article)),
                Err(e) => tracing::warn!(pmid = %id, "skipping malformed PubMed record: {}", e),
            }
        }

        let cached = items
            .iter()
            .map(|item| {
                let raw = serde_json::to_value(item).unwrap_or(serde_json::Value::Null);
                CachedPaper::from_item(item, raw)
            })
            .collect();
        spawn_cache_write(Arc::clone(&self.store), cached);

        Ok(items)
    }
}

// ===== E-utilities API types =====

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: Option<EsearchResult>,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EsummaryResponse {
    /// Keyed by PubMed ID, plus a `uids` bookkeeping entry
    result: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct PubmedArticle {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<PubmedAuthor>,
    pubdate: Option<String>,
    r#abstract: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PubmedAuthor {
    name: Option<String>,
}
