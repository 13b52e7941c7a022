//! Concurrent snapshot retrieval with partial-failure tolerance.
//!
//! One fetch is issued per remote identifier, bounded to a fixed number of
//! in-flight requests. A failed fetch becomes an error-carrying outcome and
//! never aborts its siblings: the batch degrades gracefully instead of
//! failing atomically. Outcomes are correlated to inputs by `remote_id`;
//! completion order carries no meaning and the output order is unspecified.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::catalog::snapshot_url;
use crate::fetch::FetchMarkup;
use crate::models::SnapshotFetchOutcome;

/// Maximum concurrently in-flight snapshot fetches. Kept modest to respect
/// the remote service's informal rate tolerance.
pub const MAX_IN_FLIGHT: usize = 8;

/// Retrieve the markup for every identifier in `remote_ids`.
///
/// Returns exactly one [`SnapshotFetchOutcome`] per input identifier. Each
/// failure is recorded in its outcome; it is the assembler's decision what
/// an all-failure batch means.
#[instrument(level = "info", skip_all, fields(count = remote_ids.len()))]
pub async fn retrieve<F: FetchMarkup>(
    fetcher: &F,
    base_url: &Url,
    remote_ids: &[String],
) -> Vec<SnapshotFetchOutcome> {
    let outcomes: Vec<SnapshotFetchOutcome> = stream::iter(remote_ids.iter().cloned())
        .map(|remote_id| async move {
            let url = snapshot_url(base_url, &remote_id);
            let result = fetcher.fetch(&url).await;
            match &result {
                Ok(body) => debug!(%remote_id, bytes = body.len(), "Retrieved snapshot markup"),
                Err(e) => warn!(%remote_id, error = %e, "Snapshot fetch failed; continuing batch"),
            }
            SnapshotFetchOutcome { remote_id, result }
        })
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    info!(
        total = outcomes.len(),
        succeeded = outcomes.len() - failed,
        failed,
        "Snapshot batch retrieval complete"
    );
    outcomes
}
