//! Mock provider for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{SearchProvider, SearchResultItem};
use crate::sources::{ProviderClient, ProviderError};

/// A mock provider that returns a predefined outcome and records how it
/// was called.
#[derive(Debug, Default)]
pub struct MockProvider {
    provider: SearchProvider,
    response: Mutex<Option<Result<Vec<SearchResultItem>, String>>>,
    last_limit: Mutex<Option<usize>>,
}

impl MockProvider {
    /// Create a mock that returns an empty result list
    pub fn new(provider: SearchProvider) -> Self {
        Self {
            provider,
            response: Mutex::new(None),
            last_limit: Mutex::new(None),
        }
    }

    /// Create a mock that returns the given items
    pub fn with_items(provider: SearchProvider, items: Vec<SearchResultItem>) -> Self {
        Self {
            provider,
            response: Mutex::new(Some(Ok(items))),
            last_limit: Mutex::new(None),
        }
    }

    /// Create a mock whose every search fails
    pub fn failing(provider: SearchProvider, message: impl Into<String>) -> Self {
        Self {
            provider,
            response: Mutex::new(Some(Err(message.into()))),
            last_limit: Mutex::new(None),
        }
    }

    /// The `limit` passed to the most recent search, if any
    pub fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().unwrap()
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    fn provider(&self) -> SearchProvider {
        self.provider
    }

    async fn search(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        *self.last_limit.lock().unwrap() = Some(limit);

        match &*self.response.lock().unwrap() {
            Some(Ok(items)) => Ok(items.clone()),
            Some(Err(message)) => Err(ProviderError::Api(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Helper to build an item for tests.
pub fn make_item(id: &str, title: &str, source: SearchProvider) -> SearchResultItem {
    SearchResultItem {
        id: id.to_string(),
        source,
        title: title.to_string(),
        authors: Vec::new(),
        r#abstract: None,
        url: Some(format!("http://example.com/{}", id)),
        year: None,
    }
}
