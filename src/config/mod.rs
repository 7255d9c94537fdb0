//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative-model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Generative-model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible endpoint base URL
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// API key; falls back to `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for summarization
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    /// Model used for abstract analysis
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            summary_model: default_summary_model(),
            analysis_model: default_analysis_model(),
        }
    }
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_summary_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_analysis_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding cached papers and summaries
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Default data directory for the store
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("research-gateway"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Load configuration from a file with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("RESEARCH_GATEWAY").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.summary_model, "gpt-3.5-turbo");
        assert_eq!(config.llm.analysis_model, "gpt-4o-mini");
        assert!(config
            .storage
            .data_dir
            .to_string_lossy()
            .contains("research-gateway")
            || config.storage.data_dir == PathBuf::from("./data"));
    }
}
