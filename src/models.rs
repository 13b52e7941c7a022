//! Data models for ranking snapshots and the assembled dataset.
//!
//! This module defines the core data structures flowing through the pipeline:
//! - [`RankingDate`]: one entry of the snapshot-date catalog
//! - [`SnapshotFetchOutcome`]: per-snapshot retrieval success or failure
//! - [`RankingRecord`]: one team's rank on one snapshot date
//! - [`Dataset`]: the ordered, de-duplicated collection of records
//!
//! Every value is immutable once produced; the pipeline is a pure transform
//! from remote bytes to an owned [`Dataset`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One entry of the snapshot-date catalog.
///
/// The remote source publishes the ranking periodically and addresses each
/// published snapshot with an opaque identifier (e.g. `"id13792"`). The
/// catalog pairs that identifier with the human-readable publication date
/// parsed from the navigation markup.
///
/// Within one catalog, `remote_id` values are unique and entries are sorted
/// ascending by `display_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingDate {
    /// The publication date as shown on the navigation page.
    pub display_date: NaiveDate,
    /// The opaque token the remote source uses to address this snapshot.
    pub remote_id: String,
}

/// The result of attempting to retrieve one snapshot's markup.
///
/// Exactly one of success (the raw markup) or failure (the fetch error) is
/// carried, expressed as a `Result`. Outcomes are correlated back to the
/// catalog by `remote_id`, never by position or completion order.
#[derive(Debug)]
pub struct SnapshotFetchOutcome {
    /// The identifier this outcome belongs to.
    pub remote_id: String,
    /// Raw markup on success, the fetch failure otherwise.
    pub result: Result<String, FetchError>,
}

impl SnapshotFetchOutcome {
    /// True when the retrieval produced markup.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// One team's position in the ranking on one snapshot date.
///
/// Produced by the table extractor from a single markup row. For a fixed
/// `snapshot_date`, `team_id` and `rank` are unique, and points are
/// non-increasing as rank increases (rank 1 holds the highest points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    /// Numeric team identifier carried on the table row.
    pub team_id: u32,
    /// Full team name, e.g. `"Argentina"`.
    pub team_name: String,
    /// Position in the ranking, starting at 1.
    pub rank: u32,
    /// Ranking points. Later editions publish fractional points.
    pub points: f64,
    /// Confederation label (e.g. `"CONMEBOL"`) when the table carries one.
    pub confederation: Option<String>,
    /// The publication date this record belongs to.
    pub snapshot_date: NaiveDate,
}

/// The assembled, queryable dataset: one record per team per snapshot date.
///
/// Ordered by `snapshot_date` ascending, then `rank` ascending, and unique
/// on `(snapshot_date, team_id)`. The ordering is imposed explicitly by the
/// assembler, so two runs over identical markup serialize byte-identically.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// The records, in dataset order.
    pub records: Vec<RankingRecord>,
}

impl Dataset {
    /// Number of records across all snapshots.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no snapshot contributed any record.
    ///
    /// An empty dataset is a valid terminal state (e.g. every fetch in the
    /// batch failed); collaborators render it as "no data available".
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct snapshot dates present, in ascending order.
    ///
    /// Does not rely on the records already satisfying the dataset
    /// ordering invariant, so it is safe on hand-built values too.
    pub fn snapshot_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.records.iter().map(|r| r.snapshot_date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}
