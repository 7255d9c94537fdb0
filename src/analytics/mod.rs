//! Abstract analysis service.
//!
//! Unlike the summarizer, this service has no fallback path: a missing
//! abstract or an unparseable model response is reported as an internal
//! error. The asymmetry with the summarizer's tolerant parsing is
//! deliberate and pinned by tests.

use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::llm::{ChatApi, ChatMessage};
use crate::models::{AnalyzePaperRequest, AnalyzedPaper};

const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Abstract analysis service
pub struct AnalyticsService {
    chat: Arc<dyn ChatApi>,
    model: String,
}

impl AnalyticsService {
    /// Create a new analytics service
    pub fn new(chat: Arc<dyn ChatApi>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    /// Analyze a paper's abstract into a summary, keywords and a topic.
    pub async fn analyze(&self, paper: &AnalyzePaperRequest) -> Result<AnalyzedPaper, ApiError> {
        let abstract_text = paper
            .r#abstract
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ApiError::Internal("paper abstract is missing".to_string()))?;

        let prompt = format!(
            "Analyze the abstract of a scientific article.\n\n\
             IMPORTANT: return the answer strictly as JSON.\n\
             Do NOT write text outside the JSON. Do NOT add explanations.\n\n\
             Response format:\n\
             {{\n  \"summary\": \"a short summary\",\n  \
             \"keyWords\": [\"word1\", \"word2\"],\n  \
             \"topic\": \"one or two phrases about the article's topic\"\n}}\n\n\
             Here is the text to analyze:\n{}",
            abstract_text
        );
        let messages = [
            ChatMessage::system("You are an analyst of scientific articles."),
            ChatMessage::user(prompt),
        ];

        let content = self
            .chat
            .chat(&self.model, &messages, ANALYSIS_TEMPERATURE, None)
            .await
            .map_err(|e| {
                tracing::error!("error analyzing article: {}", e);
                ApiError::Internal("failed to analyze the article".to_string())
            })?;

        let analysis: AnalysisPayload = serde_json::from_str(&content).map_err(|e| {
            tracing::error!("unparseable analysis response: {}", e);
            ApiError::Internal("failed to analyze the article".to_string())
        })?;

        Ok(AnalyzedPaper {
            id: paper.id.clone(),
            source: paper.source.clone(),
            title: paper.title.clone(),
            authors: paper.authors.clone(),
            r#abstract: paper.r#abstract.clone(),
            url: paper.url.clone(),
            year: paper.year,
            summary: analysis.summary,
            key_words: analysis.key_words,
            topic: analysis.topic,
        })
    }
}

/// Shape the model is instructed to return
#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    #[serde(default)]
    summary: String,
    #[serde(rename = "keyWords", default)]
    key_words: Vec<String>,
    #[serde(default)]
    topic: String,
}
