//! The pipeline boundary consumed by display/analysis collaborators.
//!
//! [`RankingSource`] composes the catalog resolver, the concurrent
//! retriever, and the assembler into one entry point:
//! [`RankingSource::build_dataset`]. Which snapshot dates to ingest is a
//! caller policy, passed in as a `date_selector` closure over the resolved
//! catalog; [`select_most_recent`] covers the common case.
//!
//! The source holds no mutable state, so independent callers may run
//! `build_dataset` repeatedly or concurrently; each call returns a freshly
//! owned [`Dataset`].

use std::time::Duration;

use tracing::{info, instrument};
use url::Url;

use crate::assemble::assemble;
use crate::catalog::resolve_catalog;
use crate::error::PipelineError;
use crate::fetch::{FetchMarkup, HttpFetcher, RetryFetch};
use crate::models::{Dataset, RankingDate, SnapshotFetchOutcome};
use crate::retrieve::retrieve;

/// The fixed navigation URL of the men's world ranking table.
pub const DEFAULT_BASE_URL: &str =
    "https://www.fifa.com/fifa-world-ranking/ranking-table/men/rank";

/// Retries per snapshot fetch before its outcome is recorded as failed.
const FETCH_RETRIES: usize = 2;

/// A ranking source: a fetcher plus the base URL its snapshots live under.
#[derive(Debug)]
pub struct RankingSource<F> {
    fetcher: F,
    base_url: Url,
}

impl RankingSource<RetryFetch<HttpFetcher>> {
    /// A source over the real ranking service, with retrying HTTP fetches.
    pub fn new(base_url: Url) -> reqwest::Result<Self> {
        let fetcher = RetryFetch::new(
            HttpFetcher::new()?,
            FETCH_RETRIES,
            Duration::from_millis(500),
        );
        Ok(Self::with_fetcher(fetcher, base_url))
    }
}

impl<F: FetchMarkup> RankingSource<F> {
    /// A source over an arbitrary fetcher. Tests inject stubs here.
    pub fn with_fetcher(fetcher: F, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    /// Resolve the full catalog of published snapshot dates, ascending.
    pub async fn resolve_catalog(&self) -> Result<Vec<RankingDate>, PipelineError> {
        resolve_catalog(&self.fetcher, &self.base_url).await
    }

    /// Retrieve the markup for the given identifiers, one outcome each.
    pub async fn retrieve(&self, remote_ids: &[String]) -> Vec<SnapshotFetchOutcome> {
        retrieve(&self.fetcher, &self.base_url, remote_ids).await
    }

    /// Run the whole pipeline: resolve the catalog, let `date_selector`
    /// pick the dates of interest, retrieve those snapshots concurrently,
    /// and assemble the dataset.
    ///
    /// # Errors
    ///
    /// [`PipelineError::CatalogUnavailable`] (or `CatalogFetch`) when no
    /// usable dates exist at all, [`PipelineError::UnknownSnapshotId`] when
    /// the selector invents an identifier the catalog never contained.
    /// Per-snapshot and per-row failures never fail the call; they shrink
    /// the dataset, down to empty in the worst case.
    #[instrument(level = "info", skip_all)]
    pub async fn build_dataset<S>(&self, date_selector: S) -> Result<Dataset, PipelineError>
    where
        S: FnOnce(&[RankingDate]) -> Vec<RankingDate>,
    {
        let catalog = self.resolve_catalog().await?;
        let subset = date_selector(&catalog);
        info!(
            catalog = catalog.len(),
            selected = subset.len(),
            "Selected snapshot dates"
        );

        let remote_ids: Vec<String> =
            subset.iter().map(|entry| entry.remote_id.clone()).collect();
        let outcomes = self.retrieve(&remote_ids).await;
        assemble(&subset, &outcomes)
    }
}

/// Selection policy: the `n` most recent catalog dates.
///
/// The catalog arrives sorted ascending, so this is its tail. Asking for
/// more dates than exist selects the whole catalog.
pub fn select_most_recent(n: usize) -> impl FnOnce(&[RankingDate]) -> Vec<RankingDate> {
    move |catalog| {
        let start = catalog.len().saturating_sub(n);
        catalog[start..].to_vec()
    }
}
