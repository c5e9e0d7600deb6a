//! taxon-clean - Taxonomy cleaner for specimen inventories
//!
//! Reads a CSV inventory, checks every record for missing and suspicious
//! values, reconciles ORDER/FAMILY/GENUS against the GBIF species-match
//! service, applies confident corrections and writes the annotated dataset.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taxon_clean::authority::{CachedAuthority, GbifClient, TaxonomyAuthority};
use taxon_clean::config::resolve_authority_url;
use taxon_clean::dataset::{read_csv, write_csv, Dataset};
use taxon_clean::types::{CORRECTION_NOTE, FAMILY, GENUS, ORDER, ROW_ISSUE_SUMMARY, SPECIES};
use taxon_clean::{CleanRun, Pipeline, PipelineConfig};
use taxon_common::config::{load_config, write_toml_config, TomlConfig};
use taxon_common::events::{CleanerEvent, EventBus};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

/// Columns shown in the result preview
const PREVIEW_COLUMNS: [&str; 6] = [
    SPECIES,
    ORDER,
    FAMILY,
    GENUS,
    CORRECTION_NOTE,
    ROW_ISSUE_SUMMARY,
];

#[derive(Debug, Parser)]
#[command(name = "taxon-clean", version, about = "Validate and correct taxonomy against GBIF")]
struct Args {
    /// Input CSV file (must contain a 'Species' column)
    #[arg(required_unless_present = "write_config")]
    input: Option<PathBuf>,

    /// Output CSV file [default: "<input> - Reviewed.csv" beside the input]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Species-match endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Query the authority for every record, even repeated names
    #[arg(long)]
    no_cache: bool,

    /// Number of result rows to print
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Write the effective configuration to this path
    #[arg(long)]
    write_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting taxon-clean v{}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.write_config {
        write_toml_config(&config, path)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
        info!("Configuration written to {}", path.display());
    }

    let Some(input) = args.input.as_deref() else {
        return Ok(());
    };

    let dataset = read_csv(input).with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Loaded {} records from {}", dataset.len(), input.display());

    let base_url = resolve_authority_url(args.endpoint.as_deref(), &config);
    let gbif = GbifClient::from_config(&config.authority, Some(base_url))?;

    let event_bus = EventBus::new(100);
    let progress = tokio::spawn(log_progress(event_bus.subscribe()));

    let run = if config.authority.cache_lookups && !args.no_cache {
        let cached = Arc::new(CachedAuthority::new(gbif));
        let run = clean(Arc::clone(&cached), &config, event_bus, dataset).await?;
        info!(
            "Authority cache: {} hits, {} queries",
            cached.hits(),
            cached.misses()
        );
        run
    } else {
        clean(gbif, &config, event_bus, dataset).await?
    };

    // Ends on RunCompleted, or when the pipeline drops the last sender
    if let Err(e) = progress.await {
        warn!("Progress reporter ended abnormally: {}", e);
    }

    let output = args.output.clone().unwrap_or_else(|| default_output_path(input));
    write_csv(&run.dataset, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());

    if args.preview > 0 {
        println!("{}", run.dataset.preview(args.preview, &PREVIEW_COLUMNS));
    }
    println!("{}", run.statistics.display_string());

    Ok(())
}

async fn clean<A: TaxonomyAuthority>(
    authority: A,
    config: &TomlConfig,
    event_bus: EventBus,
    dataset: Dataset,
) -> Result<CleanRun> {
    let pipeline = Pipeline::with_events(authority, PipelineConfig::from_toml(config), event_bus);
    Ok(pipeline.run(dataset).await?)
}

/// Log progress at every tenth of the run
async fn log_progress(mut rx: broadcast::Receiver<CleanerEvent>) {
    let mut last_decile = 0;
    loop {
        match rx.recv().await {
            Ok(CleanerEvent::RunStarted { total_records, .. }) => {
                info!("Processing {} records", total_records);
            }
            Ok(CleanerEvent::RecordProcessed {
                processed,
                total_records,
                ..
            }) => {
                let decile = processed * 10 / total_records.max(1);
                if decile > last_decile {
                    last_decile = decile;
                    info!("Progress: {} of {} records", processed, total_records);
                }
            }
            Ok(CleanerEvent::RunCompleted { .. }) => break,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Progress reporter skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// "<stem> - Reviewed.csv" next to the input file
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    input.with_file_name(format!("{} - Reviewed.csv", stem))
}
