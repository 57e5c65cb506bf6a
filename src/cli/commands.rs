//! CLI run orchestration

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::core::client::OpenRouterClient;
use crate::core::config::RunConfig;
use crate::core::dispatcher::Dispatcher;
use crate::dataset;
use crate::output;
use crate::prompts::{self, TemplateKind};

/// Directory containing the LegISTyr source datasets
const DATA_DIR: &str = "data";
/// Directory receiving the structured CSV artifacts
const CSV_OUTPUT_DIR: &str = "output_csv";
/// Directory receiving the aligned plain-text artifacts
const TXT_OUTPUT_DIR: &str = "output_txt";

/// Path of the dataset file for a source name
pub fn source_file(data_dir: &Path, source: &str) -> PathBuf {
    data_dir.join(format!("LegISTyr__{source}.csv"))
}

/// Run one batch translation pass: load the dataset, build all prompts,
/// dispatch them against the concurrency gate, persist both artifacts and
/// print a completion summary.
///
/// Configuration problems (unknown template, missing file or credential)
/// surface as errors before any network activity; individual row failures do
/// not.
pub async fn handle_run(source: String, config: RunConfig) -> anyhow::Result<()> {
    let template: TemplateKind = source.parse()?;

    let input = source_file(Path::new(DATA_DIR), &source);
    if !input.exists() {
        anyhow::bail!("source file not found: {}", input.display());
    }

    info!("Loading dataset from {}", input.display());
    let rows = dataset::load_rows(&input, template)?;

    let prompts = prompts::build_prompts(&rows, template);
    info!("Created {} prompts with the '{}' template", prompts.len(), template);

    let client = Arc::new(OpenRouterClient::new(config.clone())?);
    let dispatcher = Dispatcher::new(client, config.max_concurrent);

    let pb = ProgressBar::new(prompts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message(format!("model: {}", config.model));

    info!("Running parallel requests with model {}", config.model);
    let start_time = Instant::now();
    let outcomes = dispatcher.run(prompts, &pb).await;
    pb.finish_with_message("Completed");

    let (csv_path, txt_path) = output::write_artifacts(
        &outcomes,
        &config.model,
        Path::new(CSV_OUTPUT_DIR),
        Path::new(TXT_OUTPUT_DIR),
    )?;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - succeeded;
    let duration = start_time.elapsed();

    info!(
        "Completed: {} succeeded, {} failed in {:?}",
        succeeded, failed, duration
    );

    println!("\n✅ Translation run completed!");
    println!("   Succeeded: {}", succeeded);
    println!("   Failed: {}", failed);
    println!("   Time: {:?}", duration);
    println!("   CSV: {}", csv_path.display());
    println!("   TXT: {}", txt_path.display());

    Ok(())
}
