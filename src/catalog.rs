//! Snapshot-date catalog resolution.
//!
//! The ranking service exposes its full publication schedule as a navigation
//! strip on every snapshot page: one `<li>` per published date, carrying the
//! machine identifier in a `data-value` attribute and the human-readable
//! date as text (`"15 June 2023"`). The catalog resolver fetches the
//! well-known first snapshot page and turns that strip into an ordered
//! [`RankingDate`] list.
//!
//! Individual entries with unparseable labels are dropped (logged, not
//! fatal); a schedule that yields zero valid entries fails the whole run
//! with [`PipelineError::CatalogUnavailable`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::PipelineError;
use crate::fetch::FetchMarkup;
use crate::models::RankingDate;

/// The well-known identifier whose page carries the schedule navigation.
const SCHEDULE_ENTRY_ID: &str = "id1";

/// Format of the schedule's date labels, e.g. `"15 June 2023"`.
const DATE_LABEL_FORMAT: &str = "%d %B %Y";

static NAV_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.fi-ranking-schedule__nav__item").unwrap());

/// Build the page URL for one snapshot identifier.
pub(crate) fn snapshot_url(base_url: &Url, remote_id: &str) -> String {
    format!("{}/{}/", base_url.as_str().trim_end_matches('/'), remote_id)
}

/// Resolve the full catalog of published snapshot dates.
///
/// Fetches the schedule page via the supplied fetcher and extracts every
/// navigation entry carrying both a date label and an identifier attribute.
/// The result is sorted ascending by date — the basis for all downstream
/// "most recent" selection policies, which belong to the caller.
///
/// # Errors
///
/// [`PipelineError::CatalogFetch`] when the schedule page cannot be
/// retrieved at all, [`PipelineError::CatalogUnavailable`] when it yields
/// zero valid entries.
#[instrument(level = "info", skip_all)]
pub async fn resolve_catalog<F: FetchMarkup>(
    fetcher: &F,
    base_url: &Url,
) -> Result<Vec<RankingDate>, PipelineError> {
    let url = snapshot_url(base_url, SCHEDULE_ENTRY_ID);
    let markup = fetcher
        .fetch(&url)
        .await
        .map_err(PipelineError::CatalogFetch)?;

    let catalog = parse_catalog(&markup);
    if catalog.is_empty() {
        warn!(%url, "Schedule page yielded no valid date entries");
        return Err(PipelineError::CatalogUnavailable);
    }

    info!(
        count = catalog.len(),
        earliest = %catalog[0].display_date,
        latest = %catalog[catalog.len() - 1].display_date,
        "Resolved ranking date catalog"
    );
    Ok(catalog)
}

/// Extract and sort the date entries from schedule markup.
///
/// Entries missing the identifier attribute or carrying an unparseable
/// date label are dropped individually.
pub(crate) fn parse_catalog(markup: &str) -> Vec<RankingDate> {
    let document = Html::parse_document(markup);
    let mut catalog = Vec::new();

    for element in document.select(&NAV_ITEM) {
        let Some(remote_id) = element.value().attr("data-value") else {
            warn!("Schedule entry without data-value attribute; dropping");
            continue;
        };
        let label = element.text().collect::<String>();
        let label = label.trim();
        match NaiveDate::parse_from_str(label, DATE_LABEL_FORMAT) {
            Ok(display_date) => {
                debug!(%display_date, remote_id, "Parsed schedule entry");
                catalog.push(RankingDate {
                    display_date,
                    remote_id: remote_id.to_string(),
                });
            }
            Err(e) => {
                warn!(label, remote_id, error = %e, "Unparseable date label; dropping entry");
            }
        }
    }

    // Stable sort: entries sharing a date keep their markup order.
    catalog.sort_by_key(|entry| entry.display_date);
    catalog
}
