//! # Research Gateway
//!
//! A backend aggregator that fans a search query out to multiple external
//! academic-paper APIs, deduplicates and ranks the combined results, and
//! offers a summarization/analysis layer backed by a generative model with
//! persisted, content-hash-deduplicated results.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (search items, requests, summaries)
//! - [`sources`]: Provider clients with a trait-based architecture
//! - [`federation`]: The federated search orchestrator (fan-out, dedup, ranking)
//! - [`summarize`]: Content-hash-memoized summarization
//! - [`analytics`]: Strict-JSON abstract analysis
//! - [`llm`]: Generative-model client behind the [`llm::ChatApi`] trait
//! - [`store`]: Persistence contracts and the file-backed store
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client and text helpers

pub mod analytics;
pub mod config;
pub mod error;
pub mod federation;
pub mod llm;
pub mod models;
pub mod sources;
pub mod store;
pub mod summarize;
pub mod utils;

// Re-export commonly used types
pub use error::ApiError;
pub use federation::FederatedSearch;
pub use models::{SearchProvider, SearchResultItem};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
