//! Utility modules shared across the library.
//!
//! - [`HttpClient`]: HTTP client with the provider timeout and a descriptive user agent
//! - [`collapse_whitespace`]: collapse embedded newlines and runs of whitespace
//! - [`extract_year`]: pull a publication year out of a free-text date
//! - [`content_hash`]: normalized content hash used for summary deduplication

mod http;
mod text;

pub use http::HttpClient;
pub use text::{collapse_whitespace, content_hash, extract_year};
