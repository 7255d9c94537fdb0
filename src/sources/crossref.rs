//! CrossRef provider client.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{CachedPaper, SearchProvider, SearchResultItem};
use crate::sources::{spawn_cache_write, ProviderClient, ProviderError};
use crate::store::PaperStore;
use crate::utils::HttpClient;

const CROSSREF_API_URL: &str = "https://api.crossref.org/works";

/// CrossRef provider client
#[derive(Debug, Clone)]
pub struct CrossRefClient {
    client: Arc<HttpClient>,
    store: Arc<dyn PaperStore>,
}

impl CrossRefClient {
    /// Create a new CrossRef client
    pub fn new(client: Arc<HttpClient>, store: Arc<dyn PaperStore>) -> Self {
        Self { client, store }
    }

    /// Normalize one CrossRef work into an item
    fn to_item(work: CrWork) -> SearchResultItem {
        let id = work
            .doi
            .clone()
            .or_else(|| work.url.clone())
            .unwrap_or_default();

        // CrossRef splits names into given/family parts
        let authors = work
            .author
            .into_iter()
            .map(|author| {
                format!(
                    "{} {}",
                    author.given.unwrap_or_default(),
                    author.family.unwrap_or_default()
                )
                .trim()
                .to_string()
            })
            .filter(|name| !name.is_empty())
            .collect();

        let year = work
            .published
            .as_ref()
            .and_then(|date| date.date_parts.first())
            .and_then(|parts| parts.first())
            .and_then(|year| *year)
            .map(|year| year as i32);

        SearchResultItem {
            id,
            source: SearchProvider::Crossref,
            title: work.title.into_iter().next().unwrap_or_default(),
            authors,
            r#abstract: work.r#abstract,
            url: work.url,
            year,
        }
    }
}

#[async_trait]
impl ProviderClient for CrossRefClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Crossref
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let url = format!(
            "{}?query={}&rows={}&sort=relevance&order=desc",
            CROSSREF_API_URL,
            urlencoding::encode(query),
            limit
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "CrossRef returned status: {}",
                response.status()
            )));
        }

        let data: CrResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("CrossRef JSON: {}", e)))?;

        let works = data.message.map(|message| message.items).unwrap_or_default();
        let items: Vec<SearchResultItem> = works.into_iter().map(Self::to_item).collect();

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

// ===== CrossRef API types =====

#[derive(Debug, Deserialize)]
struct CrResponse {
    message: Option<CrMessage>,
}

#[derive(Debug, Deserialize)]
struct CrMessage {
    #[serde(default)]
    items: Vec<CrWork>,
}

#[derive(Debug, Deserialize)]
struct CrWork {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrAuthor>,
    r#abstract: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    published: Option<CrDate>,
}

#[derive(Debug, Deserialize)]
struct CrAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i64>>>,
}
