//! Error taxonomy for the ingestion pipeline.
//!
//! Two layers of failure exist and they propagate differently:
//!
//! - [`FetchError`] is per-snapshot and non-fatal: it is recorded in the
//!   snapshot's outcome, logged, and the batch continues without it.
//! - [`PipelineError`] is fatal to the current `build_dataset` call:
//!   either no usable catalog exists at all, or the caller handed the
//!   assembler an identifier the catalog subset does not know.
//!
//! Per-row extraction failures are not errors at all; they are typed skip
//! reasons carried by the extractor (see [`crate::extract::SkipReason`]).

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single markup retrieval.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote answered with a non-2xx status.
    #[error("unexpected status {status}")]
    Status {
        /// The status the remote answered with.
        status: StatusCode,
    },
    /// The request never produced a response: connection failure, TLS
    /// failure, or the per-request timeout elapsing.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Whether retrying this failure could plausibly succeed.
    ///
    /// Transport failures and 5xx statuses are transient; a 4xx is a
    /// deterministic answer and is never retried.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status } => status.is_server_error(),
        }
    }
}

/// Fatal failure of a `build_dataset` run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The navigation page yielded zero parseable date entries, so there
    /// is nothing to retrieve. Surfaced to users as "ranking currently
    /// unavailable".
    #[error("no usable ranking dates could be resolved from the schedule page")]
    CatalogUnavailable,
    /// A successful outcome carried an identifier the catalog subset does
    /// not contain. This is caller/catalog desynchronization, not a
    /// transient condition, so it fails fast.
    #[error("snapshot id {0:?} has no matching catalog entry")]
    UnknownSnapshotId(String),
    /// The catalog fetch itself failed; without the schedule page no
    /// dates can be resolved.
    #[error("failed to fetch the schedule page")]
    CatalogFetch(#[source] FetchError),
}
