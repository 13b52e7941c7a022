//! Command-line interface definitions for the ranking scraper.
//!
//! All options can be provided via command-line flags; the base URL also
//! falls back to an environment variable so deployments can point at a
//! mirror without changing the invocation.

use clap::Parser;

/// Command-line arguments for the ranking scraper binary.
///
/// # Examples
///
/// ```sh
/// # Most recent snapshot only (the default policy)
/// fifa_rank_scraper -j ./json
///
/// # The five most recent snapshots
/// fifa_rank_scraper -j ./json --dates 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the dataset JSON file
    #[arg(short, long)]
    pub json_output_dir: String,

    /// How many of the most recent snapshot dates to ingest
    #[arg(short, long, default_value_t = 1)]
    pub dates: usize,

    /// Base URL of the ranking table (override for mirrors/testing)
    #[arg(long, env = "RANKING_BASE_URL", default_value = crate::pipeline::DEFAULT_BASE_URL)]
    pub base_url: String,
}
