//! arXiv provider client.
//!
//! arXiv answers with an Atom feed rather than JSON. Parsing is tolerant:
//! entries that do not yield both a title and an identifier are silently
//! skipped, and embedded newlines in titles and abstracts are collapsed to
//! single spaces.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{CachedPaper, SearchProvider, SearchResultItem};
use crate::sources::{spawn_cache_write, ProviderClient, ProviderError};
use crate::store::PaperStore;
use crate::utils::{collapse_whitespace, extract_year, HttpClient};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv provider client
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: Arc<HttpClient>,
    store: Arc<dyn PaperStore>,
}

impl ArxivClient {
    /// Create a new arXiv client
    pub fn new(client: Arc<HttpClient>, store: Arc<dyn PaperStore>) -> Self {
        Self { client, store }
    }

    /// Parse the Atom feed into normalized items, capped at `limit`.
    fn parse_feed(xml: &str, limit: usize) -> Result<Vec<SearchResultItem>, ProviderError> {
        let feed: AtomFeed = quick_xml::de::from_str(xml)?;

        let items = feed
            .entries
            .into_iter()
            .take(limit)
            .filter_map(|entry| {
                // entries without both a title and an id are skipped
                let id_url = entry.id?;
                let title = entry.title?;

                let arxiv_id = id_url.rsplit('/').next().unwrap_or(&id_url).to_string();
                if arxiv_id.is_empty() {
                    return None;
                }

                Some(SearchResultItem {
                    id: arxiv_id,
                    source: SearchProvider::Arxiv,
                    title: collapse_whitespace(&title),
                    authors: entry
                        .authors
                        .into_iter()
                        .filter_map(|author| author.name)
                        .collect(),
                    r#abstract: entry.summary.map(|s| collapse_whitespace(&s)),
                    url: Some(id_url),
                    year: entry.published.as_deref().and_then(extract_year),
                })
            })
            .collect();

        Ok(items)
    }
}

#[async_trait]
impl ProviderClient for ArxivClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Arxiv
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let url = format!(
            "{}?search_query=all:{}&start=0&max_results={}&sortBy=relevance",
            ARXIV_API_URL,
            urlencoding::encode(query),
            limit
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "arXiv returned status: {}",
                response.status()
            )));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to read arXiv response: {}", e)))?;

        let items = Self::parse_feed(&xml, limit)?;

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

// ===== arXiv Atom feed types =====

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2301.12345v1</id>
    <title>Neural
      Networks for Everything</title>
    <summary>A summary
      spanning lines.</summary>
    <published>2023-01-15T10:00:00Z</published>
    <author><name>Alice Writer</name></author>
    <author><name>Bob Author</name></author>
    <link href="http://arxiv.org/abs/2301.12345v1" rel="alternate" type="text/html"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2302.00001v2</id>
    <summary>Entry without a title.</summary>
  </entry>
  <entry>
    <title>Entry without an id</title>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let items = ArxivClient::parse_feed(FEED, 10).unwrap();

        // entries missing a title or an id are silently skipped
        assert_eq!(items.len(), 1);

        let item = &items[0];
        // the version suffix stays on the id
        assert_eq!(item.id, "2301.12345v1");
        assert_eq!(item.source, SearchProvider::Arxiv);
        // embedded newlines collapse to single spaces
        assert_eq!(item.title, "Neural Networks for Everything");
        assert_eq!(
            item.r#abstract.as_deref(),
            Some("A summary spanning lines.")
        );
        assert_eq!(item.authors, vec!["Alice Writer", "Bob Author"]);
        assert_eq!(item.url.as_deref(), Some("http://arxiv.org/abs/2301.12345v1"));
        assert_eq!(item.year, Some(2023));
    }

    #[test]
    fn test_parse_feed_respects_limit() {
        let many = format!(
            r#"<feed xmlns="http://www.w3.org/2005/Atom">{}</feed>"#,
            (0..5)
                .map(|i| format!(
                    "<entry><id>http://arxiv.org/abs/23{i}.0000{i}v1</id><title>Paper {i}</title></entry>"
                ))
                .collect::<String>()
        );

        let items = ArxivClient::parse_feed(&many, 2).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Paper 0");
    }

    #[test]
    fn test_parse_feed_missing_published_leaves_year_absent() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom">
          <entry><id>http://arxiv.org/abs/2301.1v1</id><title>No Date</title></entry>
        </feed>"#;

        let items = ArxivClient::parse_feed(feed, 10).unwrap();
        assert_eq!(items[0].year, None);
    }

    #[test]
    fn test_parse_invalid_xml() {
        assert!(ArxivClient::parse_feed("not xml at all <", 10).is_err());
    }
}
