//! Dataset assembly: join outcomes to catalog dates and impose invariants.
//!
//! The assembler is the single place where dataset order is decided. Fetch
//! completion order carries no meaning upstream, so the concatenated records
//! are explicitly sorted by `(snapshot_date, rank)` and de-duplicated on
//! `(snapshot_date, team_id)` before the dataset leaves the pipeline. Two
//! runs over identical markup therefore yield identical datasets, whatever
//! order the network delivered the snapshots in.

use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;
use tracing::{info, instrument, warn};

use crate::error::PipelineError;
use crate::extract;
use crate::models::{Dataset, RankingDate, SnapshotFetchOutcome};

/// Assemble the final dataset from a catalog subset and its fetch outcomes.
///
/// Failed outcomes are logged and skipped; a batch with zero successes
/// yields an empty dataset, which is a valid terminal state. A successful
/// outcome whose identifier is missing from `catalog_subset` indicates
/// caller/catalog desynchronization and fails fast with
/// [`PipelineError::UnknownSnapshotId`].
#[instrument(level = "info", skip_all, fields(outcomes = outcomes.len()))]
pub fn assemble(
    catalog_subset: &[RankingDate],
    outcomes: &[SnapshotFetchOutcome],
) -> Result<Dataset, PipelineError> {
    let date_by_id: HashMap<&str, NaiveDate> = catalog_subset
        .iter()
        .map(|entry| (entry.remote_id.as_str(), entry.display_date))
        .collect();

    let mut records = Vec::new();
    let mut failed_snapshots = 0usize;
    let mut skipped_rows = 0usize;

    for outcome in outcomes {
        let markup = match &outcome.result {
            Ok(markup) => markup,
            Err(e) => {
                warn!(remote_id = %outcome.remote_id, error = %e, "Snapshot missing from dataset");
                failed_snapshots += 1;
                continue;
            }
        };

        let snapshot_date = *date_by_id
            .get(outcome.remote_id.as_str())
            .ok_or_else(|| PipelineError::UnknownSnapshotId(outcome.remote_id.clone()))?;

        let extraction = extract::extract(markup, snapshot_date);
        if extraction.records.is_empty() {
            warn!(remote_id = %outcome.remote_id, %snapshot_date, "Snapshot yielded no records");
        }
        skipped_rows += extraction.skipped.len();
        records.extend(extraction.records);
    }

    // Explicit dataset order, independent of fetch completion order.
    records.sort_by(|a, b| {
        (a.snapshot_date, a.rank).cmp(&(b.snapshot_date, b.rank))
    });
    let before = records.len();
    let records: Vec<_> = records
        .into_iter()
        .unique_by(|r| (r.snapshot_date, r.team_id))
        .collect();
    let duplicates = before - records.len();
    if duplicates > 0 {
        warn!(duplicates, "Dropped duplicate (snapshot_date, team_id) records");
    }

    info!(
        records = records.len(),
        snapshots = outcomes.len() - failed_snapshots,
        failed_snapshots,
        skipped_rows,
        "Assembled ranking dataset"
    );
    Ok(Dataset { records })
}
