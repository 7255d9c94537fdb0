//! Summarization service.
//!
//! Summaries are memoized by a content hash of the normalized input text:
//! a repeat request with semantically identical text returns the stored
//! record without invoking the generative model. That memoization is the
//! primary cost-control mechanism of this component.

use std::sync::Arc;

use crate::error::ApiError;
use crate::federation::FederatedSearch;
use crate::llm::{ChatApi, ChatMessage};
use crate::models::{
    RelatedPaper, SearchProvider, SearchRequest, SummarizeRequest, SummaryRecord, SummaryResponse,
};
use crate::store::{PaperStore, StoreError, SummaryStore};
use crate::utils::content_hash;

const SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 1000;

/// Characters of raw model output kept when it is not valid JSON
const FALLBACK_SUMMARY_CHARS: usize = 500;

/// How many key ideas seed the related-paper query
const RELATED_QUERY_IDEAS: usize = 3;
const RELATED_PAPERS_LIMIT: usize = 5;

/// Summarization service
pub struct SummarizeService {
    papers: Arc<dyn PaperStore>,
    summaries: Arc<dyn SummaryStore>,
    search: Arc<FederatedSearch>,
    chat: Arc<dyn ChatApi>,
    model: String,
}

impl SummarizeService {
    /// Create a new summarization service
    pub fn new(
        papers: Arc<dyn PaperStore>,
        summaries: Arc<dyn SummaryStore>,
        search: Arc<FederatedSearch>,
        chat: Arc<dyn ChatApi>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            papers,
            summaries,
            search,
            chat,
            model: model.into(),
        }
    }

    /// Summarize the requested input for `user_id`.
    ///
    /// Exactly one of `paper_id`, `text` or `url` must be present; `url`
    /// is an explicit not-implemented error.
    pub async fn summarize(
        &self,
        request: &SummarizeRequest,
        user_id: &str,
    ) -> Result<SummaryResponse, ApiError> {
        let (text, source) = self.resolve_input(request).await?;

        let input_hash = content_hash(&text);

        if let Some(existing) = self.summaries.get_summary(&input_hash).await? {
            return Ok(memoized_response(existing));
        }

        let (summary, key_ideas) = self.generate_summary(&text).await;

        let record = SummaryRecord {
            user_id: user_id.to_string(),
            paper_id: request.paper_id.clone(),
            source,
            input_hash: input_hash.clone(),
            summary: summary.clone(),
            key_ideas: key_ideas.clone(),
            created_at: chrono::Utc::now(),
        };

        match self.summaries.insert_summary(&record).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                // lost the check-then-create race; the record that made it
                // into the store wins
                tracing::debug!(hash = %input_hash, "summary already stored by a concurrent request");
                if let Some(existing) = self.summaries.get_summary(&input_hash).await? {
                    return Ok(memoized_response(existing));
                }
            }
            Err(e) => return Err(e.into()),
        }

        let related_papers = self.find_related(&key_ideas).await;

        Ok(SummaryResponse {
            summary,
            key_ideas,
            related_papers,
        })
    }

    async fn resolve_input(&self, request: &SummarizeRequest) -> Result<(String, String), ApiError> {
        if let Some(paper_id) = &request.paper_id {
            let paper = self
                .papers
                .get_paper(paper_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("paper not found".to_string()))?;

            // papers cached without an abstract fall back to their title
            let text = paper
                .r#abstract
                .filter(|text| !text.is_empty())
                .unwrap_or(paper.title);
            Ok((text, "abstract".to_string()))
        } else if let Some(text) = &request.text {
            Ok((text.clone(), "text".to_string()))
        } else if request.url.is_some() {
            Err(ApiError::BadRequest(
                "URL summarization not implemented yet".to_string(),
            ))
        } else {
            Err(ApiError::BadRequest(
                "either paper_id, text, or url must be provided".to_string(),
            ))
        }
    }

    /// Ask the model for a summary. Never fails: transport errors and
    /// unparseable output both degrade to a usable response.
    async fn generate_summary(&self, text: &str) -> (String, Vec<String>) {
        let prompt = format!(
            "Summarize the following scientific text. Be brief and structured, no filler.\n\n\
             Text to summarize:\n{}\n\n\
             Return the result as JSON:\n\
             {{\n  \"summary\": \"a concise description in 5-10 sentences\",\n  \
             \"keyIdeas\": [\"key idea 1\", \"key idea 2\", \"key idea 3\"]\n}}",
            text
        );
        let messages = [ChatMessage::user(prompt)];

        let content = match self
            .chat
            .chat(
                &self.model,
                &messages,
                SUMMARY_TEMPERATURE,
                Some(SUMMARY_MAX_TOKENS),
            )
            .await
        {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("error generating summary: {}", e);
                return (
                    "An error occurred while generating the summary".to_string(),
                    Vec::new(),
                );
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(parsed) => {
                let summary = parsed
                    .get("summary")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| "Unable to generate a summary".to_string());
                let key_ideas = parsed
                    .get("keyIdeas")
                    .and_then(serde_json::Value::as_array)
                    .map(|ideas| {
                        ideas
                            .iter()
                            .filter_map(serde_json::Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                (summary, key_ideas)
            }
            Err(_) => {
                // the model ignored the JSON instruction; keep a truncated
                // slice of the raw text instead of failing the request
                let truncated: String = content.chars().take(FALLBACK_SUMMARY_CHARS).collect();
                (format!("{}...", truncated), Vec::new())
            }
        }
    }

    /// Best-effort related-paper lookup seeded by the key ideas.
    async fn find_related(&self, key_ideas: &[String]) -> Vec<RelatedPaper> {
        if key_ideas.is_empty() {
            return Vec::new();
        }

        let query = key_ideas
            .iter()
            .take(RELATED_QUERY_IDEAS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        let request = SearchRequest::new(query)
            .provider(SearchProvider::SemanticScholar)
            .limit(RELATED_PAPERS_LIMIT);
        let response = self.search.search(&request).await;

        response
            .items
            .into_iter()
            .map(|item| RelatedPaper {
                id: item.id,
                title: item.title,
                url: item.url,
                source: item.source.as_str().to_string(),
            })
            .collect()
    }
}

/// Memoized records return without related papers.
fn memoized_response(record: SummaryRecord) -> SummaryResponse {
    SummaryResponse {
        summary: record.summary,
        key_ideas: record.key_ideas,
        related_papers: Vec::new(),
    }
}
