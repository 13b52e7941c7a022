//! Binary entry point: run the ingestion pipeline and persist the dataset.
//!
//! ```sh
//! fifa_rank_scraper -j ./json --dates 3
//! ```

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

use fifa_rank_scraper::cli::Cli;
use fifa_rank_scraper::outputs::json;
use fifa_rank_scraper::pipeline::{RankingSource, select_most_recent};
use fifa_rank_scraper::utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fifa_rank_scraper starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, args.dates, %args.base_url, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable before any network work.
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let base_url = Url::parse(&args.base_url)?;
    let source = RankingSource::new(base_url)?;

    // Fatal errors here mean "ranking currently unavailable"; a partially
    // failed batch still produces whatever dataset could be assembled.
    let dataset = match source.build_dataset(select_most_recent(args.dates)).await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(error = %e, "Ranking currently unavailable");
            return Err(e.into());
        }
    };

    if dataset.is_empty() {
        info!("No ranking data available for the selected dates");
    } else {
        info!(
            records = dataset.len(),
            snapshots = dataset.snapshot_dates().len(),
            "Dataset assembled"
        );
    }

    let path = json::write_dataset(&dataset, &args.json_output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        path = %path,
        "Execution complete"
    );

    Ok(())
}
