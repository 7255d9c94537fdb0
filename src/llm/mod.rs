//! Generative-model client.
//!
//! The chat backend is an explicitly constructed, injected dependency:
//! services take an `Arc<dyn ChatApi>` rather than reaching for a shared
//! client handle. [`OpenAiChat`] talks to any OpenAI-compatible chat
//! completions endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;

/// Timeout for generative-model calls; these run much longer than
/// provider searches
const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

/// A role-tagged chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Build a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Errors from the generative-model backend
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("chat request failed: {0}")]
    Http(String),

    #[error("chat API returned status: {0}")]
    Api(u16),

    #[error("chat API returned an empty response")]
    EmptyResponse,

    #[error("failed to parse chat response: {0}")]
    Parse(String),
}

/// Synchronous chat-completion contract.
///
/// Takes role-tagged messages plus a temperature and optional max-token
/// bound; returns free-text content that callers expect (but are not
/// guaranteed) to be JSON.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError>;
}

/// Client for OpenAI-compatible chat completion endpoints
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiChat {
    /// Create a client from configuration; fails when no API key is set
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(CHAT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Resolve the chat completions endpoint from the base URL
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

#[async_trait]
impl ChatApi for OpenAiChat {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(max_tokens) = max_tokens {
            body["max_tokens"] = max_tokens.into();
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Api(response.status().as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(content)
    }
}
