//! Summarization and analysis models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paper::SearchProvider;

/// A summarization request.
///
/// Exactly one of `paper_id`, `text`, or `url` is the effective input; the
/// service rejects requests that carry none of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// External ID of a previously cached paper
    pub paper_id: Option<String>,

    /// Provider hint for the paper lookup
    pub provider: Option<SearchProvider>,

    /// Raw text to summarize
    pub text: Option<String>,

    /// URL to summarize (not implemented)
    pub url: Option<String>,
}

impl SummarizeRequest {
    /// Summarize a cached paper by its external ID
    pub fn for_paper(paper_id: impl Into<String>) -> Self {
        Self {
            paper_id: Some(paper_id.into()),
            ..Default::default()
        }
    }

    /// Summarize raw text
    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Summarize the content behind a URL
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// Persisted summary, keyed by the content hash of its normalized input.
///
/// Created once per distinct input and treated as immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub user_id: String,
    pub paper_id: Option<String>,

    /// Where the input text came from: `"abstract"` or `"text"`
    pub source: String,

    pub input_hash: String,
    pub summary: String,
    pub key_ideas: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Response of a summarization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub key_ideas: Vec<String>,
    pub related_papers: Vec<RelatedPaper>,
}

/// A paper related to a generated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPaper {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
}

/// A paper submitted for abstract analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePaperRequest {
    pub id: String,
    pub source: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub r#abstract: Option<String>,
    pub url: Option<String>,
    pub year: Option<i32>,

    /// Optional previously generated summary, echoed back untouched
    pub summary: Option<String>,

    /// Optional previously extracted keywords, echoed back untouched
    #[serde(rename = "keyWords")]
    pub key_words: Option<Vec<String>>,
}

/// Analysis result: the submitted paper fields plus the model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedPaper {
    pub id: String,
    pub source: String,
    pub title: String,
    pub authors: Vec<String>,
    pub r#abstract: Option<String>,
    pub url: Option<String>,
    pub year: Option<i32>,
    pub summary: String,
    #[serde(rename = "keyWords")]
    pub key_words: Vec<String>,
    pub topic: String,
}
