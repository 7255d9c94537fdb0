//! Generic web search provider.

use async_trait::async_trait;

use crate::models::{SearchProvider, SearchResultItem};
use crate::sources::{ProviderClient, ProviderError};

/// Web search client.
///
/// Intentionally a stub: it participates in the fan-out but always returns
/// an empty list with a warning until a real backend is wired in.
#[derive(Debug, Clone, Default)]
pub struct WebSearchClient;

impl WebSearchClient {
    /// Create a new web search client
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProviderClient for WebSearchClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::WebSearch
    }

    async fn search(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        tracing::warn!("web search not implemented yet");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_returns_empty() {
        let client = WebSearchClient::new();
        let items = client.search("anything", 10).await.unwrap();
        assert!(items.is_empty());
    }
}
