//! # FIFA Rank Scraper
//!
//! An ingestion pipeline that turns the periodically-published FIFA men's
//! world ranking table into a structured, queryable dataset: one record per
//! team per snapshot date, with rank, points, and confederation.
//!
//! ## Architecture
//!
//! The pipeline is a pure transform from remote bytes to an immutable
//! [`models::Dataset`] value:
//!
//! 1. **Catalog**: resolve the ordered list of published snapshot dates and
//!    their opaque remote identifiers from the schedule navigation page
//! 2. **Selection**: a caller-supplied policy picks the dates of interest
//!    (e.g. [`pipeline::select_most_recent`])
//! 3. **Retrieval**: bounded-concurrency fetches, one per identifier, with
//!    per-snapshot failures carried as values instead of aborting the batch
//! 4. **Extraction**: per-snapshot table parsing with per-row skip semantics
//! 5. **Assembly**: join outcomes back to their dates, sort, de-duplicate
//!
//! Fatal conditions are limited to an unusable catalog and
//! caller/catalog desynchronization; everything else degrades the dataset
//! gracefully, down to empty. See [`error`] for the taxonomy.
//!
//! ## Entry point
//!
//! ```no_run
//! use fifa_rank_scraper::pipeline::{RankingSource, select_most_recent, DEFAULT_BASE_URL};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = RankingSource::new(Url::parse(DEFAULT_BASE_URL)?)?;
//! let dataset = source.build_dataset(select_most_recent(1)).await?;
//! println!("{} records", dataset.len());
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod retrieve;
pub mod utils;

pub use error::{FetchError, PipelineError};
pub use models::{Dataset, RankingDate, RankingRecord, SnapshotFetchOutcome};
pub use pipeline::{RankingSource, select_most_recent};
