//! Main entry point for the LegISTyr batch translation CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use legistyr_translator::cli::commands;
use legistyr_translator::core::config::RunConfig;

/// LegISTyr batch translator - concurrency-limited LLM translation runs
#[derive(Parser, Debug)]
#[command(name = "legistyr-translator", version, about, long_about = None)]
struct Args {
    /// Source dataset name (e.g. "homonyms" for data/LegISTyr__homonyms.csv)
    #[arg(long)]
    source: String,

    /// Model identifier (e.g. "openai/gpt-4o-mini")
    #[arg(long)]
    model: String,

    /// API key for OpenRouter (defaults to OPENROUTER_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum tokens for completion
    #[arg(long, default_value_t = 1000)]
    max_tokens: u32,

    /// Temperature for generation
    #[arg(long, default_value_t = 0.1)]
    temperature: f32,

    /// Maximum concurrent requests
    #[arg(long, default_value_t = 15)]
    max_concurrent: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legistyr_translator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = RunConfig::new(args.model);
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    config.max_tokens = args.max_tokens;
    config.temperature = args.temperature;
    config.max_concurrent = args.max_concurrent;

    commands::handle_run(args.source, config).await
}
