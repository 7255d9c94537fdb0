//! Error taxonomy exposed to the HTTP/controller layer.

use crate::store::StoreError;

/// Errors surfaced to callers of the service layer.
///
/// Federated search never returns these; it degrades to placeholder
/// results instead. Summarize and analyze use them to distinguish
/// client-side problems from internal failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed or missing a required input
    #[error("{0}")]
    BadRequest(String),

    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// An internal failure the caller cannot fix
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status class for the excluded controller layer
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(format!("storage error: {}", err))
    }
}
