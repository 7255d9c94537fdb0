use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use research_gateway::analytics::AnalyticsService;
use research_gateway::config::{get_config, load_config, Config};
use research_gateway::federation::FederatedSearch;
use research_gateway::llm::OpenAiChat;
use research_gateway::models::{
    AnalyzePaperRequest, DeepResearchRequest, Language, ResearchDepth, SearchProvider,
    SearchRequest, SummarizeRequest,
};
use research_gateway::store::FsStore;
use research_gateway::summarize::SummarizeService;
use research_gateway::utils::HttpClient;

/// Research Gateway - federated academic paper search with LLM-backed
/// summarization and analysis
#[derive(Parser, Debug)]
#[command(name = "research-gateway")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search academic papers across providers, summarize and analyze them", long_about = None)]
struct Cli {
    /// Enable verbose logging (-v, -vv for more)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for papers on one provider or all of them
    Search {
        /// Free-text query
        query: String,

        /// Provider tag (semantic_scholar, arxiv, pubmed, crossref,
        /// web_search, all_sources)
        #[arg(long, short)]
        provider: Option<String>,

        /// Maximum number of results (1-50)
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },

    /// Run an all-sources search with a wider source budget
    DeepResearch {
        /// Research topic
        topic: String,

        /// Source budget (10-200)
        #[arg(long, default_value_t = 50)]
        max_sources: usize,

        /// Research depth (quick, standard, deep)
        #[arg(long, default_value = "standard")]
        depth: String,

        /// Preferred source language (ru, en, any)
        #[arg(long, default_value = "any")]
        language: String,
    },

    /// Summarize a cached paper, raw text, or URL
    Summarize {
        /// External ID of a previously cached paper
        #[arg(long)]
        paper_id: Option<String>,

        /// Raw text to summarize
        #[arg(long)]
        text: Option<String>,

        /// URL to summarize (not implemented)
        #[arg(long)]
        url: Option<String>,

        /// User the summary is recorded for
        #[arg(long, default_value = "cli")]
        user: String,
    },

    /// Analyze a paper's abstract; reads the paper JSON from a file or stdin
    Analyze {
        /// Path to a JSON file with the paper fields; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "research_gateway=info",
        1 => "research_gateway=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path).context("failed to load configuration")?,
        None => get_config(),
    };

    let store = Arc::new(
        FsStore::new(config.storage.data_dir.clone()).context("failed to initialize store")?,
    );
    let http = Arc::new(HttpClient::new());
    let search = Arc::new(FederatedSearch::with_defaults(http, store.clone()));

    match cli.command {
        Commands::Search {
            query,
            provider,
            limit,
        } => {
            let provider = provider
                .map(|tag| tag.parse::<SearchProvider>())
                .transpose()
                .map_err(anyhow::Error::msg)?;

            let mut request = SearchRequest::new(query).limit(limit);
            request.provider = provider;

            let response = search.search(&request).await;
            print_json(&response)
        }

        Commands::DeepResearch {
            topic,
            max_sources,
            depth,
            language,
        } => {
            let request = DeepResearchRequest::new(topic)
                .max_sources(max_sources)
                .depth(depth.parse::<ResearchDepth>().map_err(anyhow::Error::msg)?)
                .language(language.parse::<Language>().map_err(anyhow::Error::msg)?);

            let report = search.deep_research(&request).await;
            print_json(&report)
        }

        Commands::Summarize {
            paper_id,
            text,
            url,
            user,
        } => {
            let service = summarize_service(&config, store, Arc::clone(&search))?;
            let request = SummarizeRequest {
                paper_id,
                provider: None,
                text,
                url,
            };

            let response = service
                .summarize(&request, &user)
                .await
                .map_err(|e| anyhow::anyhow!("{} ({})", e, e.status_code()))?;
            print_json(&response)
        }

        Commands::Analyze { file } => {
            let chat = Arc::new(OpenAiChat::new(&config.llm).context("failed to create chat client")?);
            let service = AnalyticsService::new(chat, config.llm.analysis_model.clone());

            let input = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read stdin")?;
                    buffer
                }
            };
            let paper: AnalyzePaperRequest =
                serde_json::from_str(&input).context("invalid paper JSON")?;

            let analyzed = service
                .analyze(&paper)
                .await
                .map_err(|e| anyhow::anyhow!("{} ({})", e, e.status_code()))?;
            print_json(&analyzed)
        }
    }
}

fn summarize_service(
    config: &Config,
    store: Arc<FsStore>,
    search: Arc<FederatedSearch>,
) -> Result<SummarizeService> {
    let chat = Arc::new(OpenAiChat::new(&config.llm).context("failed to create chat client")?);
    Ok(SummarizeService::new(
        store.clone(),
        store,
        search,
        chat,
        config.llm.summary_model.clone(),
    ))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
