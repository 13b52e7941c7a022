//! Ranking-table extraction from snapshot markup.
//!
//! A snapshot page embeds one row-oriented table: each `<tr>` carries the
//! numeric team identifier in a `data-team-id` attribute, the team name in
//! a `span.fi-t__nText` text node, and rank / points / confederation in
//! dedicated cells. The markup carries no schema guarantee, so every field
//! access is a validated lookup.
//!
//! Extraction is deliberately best-effort: a row that cannot be parsed into
//! a [`RankingRecord`] is skipped individually with a typed [`SkipReason`],
//! and the remaining rows continue. Malformed markup for one team must not
//! discard the whole snapshot. A page with no ranking table at all yields
//! an empty extraction, not an error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::models::RankingRecord;

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static NAME: Lazy<Selector> = Lazy::new(|| Selector::parse("span.fi-t__nText").unwrap());
static RANK_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.fi-table__rank").unwrap());
static POINTS_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.fi-table__points").unwrap());
static CONFED_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.fi-table__confederation").unwrap());

/// Why one table row could not become a [`RankingRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The row carries no `data-team-id` attribute.
    #[error("row has no data-team-id attribute")]
    MissingTeamId,
    /// The `data-team-id` attribute is not an integer.
    #[error("unparseable team id {0:?}")]
    BadTeamId(String),
    /// The row has no team-name node.
    #[error("row has no team name")]
    MissingName,
    /// The row has no rank cell.
    #[error("row has no rank cell")]
    MissingRank,
    /// The rank cell is not a positive integer.
    #[error("unparseable rank {0:?}")]
    BadRank(String),
    /// The row has no points cell.
    #[error("row has no points cell")]
    MissingPoints,
    /// The points cell is not a non-negative number.
    #[error("unparseable points {0:?}")]
    BadPoints(String),
}

/// One skipped row, with enough context to diagnose the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based index of the row within the table.
    pub index: usize,
    /// Why the row was skipped.
    pub reason: SkipReason,
}

/// The result of extracting one snapshot's table: the records that parsed,
/// plus the rows that did not.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Successfully parsed records, in table order.
    pub records: Vec<RankingRecord>,
    /// Rows that failed to parse, in table order.
    pub skipped: Vec<SkippedRow>,
}

/// Extract every parseable ranking record from snapshot markup.
///
/// All returned records carry the supplied `snapshot_date`; dates are never
/// inferred from the markup itself.
#[instrument(level = "info", skip_all, fields(%snapshot_date))]
pub fn extract(markup: &str, snapshot_date: NaiveDate) -> Extraction {
    let document = Html::parse_document(markup);
    let mut extraction = Extraction::default();

    for (index, row) in document.select(&ROW).enumerate() {
        match parse_row(row, snapshot_date) {
            Ok(record) => extraction.records.push(record),
            Err(reason) => {
                warn!(row = index, %reason, "Skipping malformed ranking row");
                extraction.skipped.push(SkippedRow { index, reason });
            }
        }
    }

    if extraction.records.is_empty() && extraction.skipped.is_empty() {
        warn!("No ranking table rows found in snapshot markup");
    } else {
        info!(
            records = extraction.records.len(),
            skipped = extraction.skipped.len(),
            "Extracted ranking table"
        );
    }
    extraction
}

/// Parse one table row into a record, or explain why it cannot be one.
fn parse_row(row: ElementRef<'_>, snapshot_date: NaiveDate) -> Result<RankingRecord, SkipReason> {
    let team_id_raw = row
        .value()
        .attr("data-team-id")
        .ok_or(SkipReason::MissingTeamId)?;
    let team_id: u32 = team_id_raw
        .trim()
        .parse()
        .map_err(|_| SkipReason::BadTeamId(team_id_raw.to_string()))?;

    let team_name = cell_text(row, &NAME).ok_or(SkipReason::MissingName)?;

    let rank_raw = cell_text(row, &RANK_CELL).ok_or(SkipReason::MissingRank)?;
    let rank: u32 = rank_raw
        .parse()
        .map_err(|_| SkipReason::BadRank(rank_raw.clone()))?;
    if rank == 0 {
        return Err(SkipReason::BadRank(rank_raw));
    }

    let points_raw = cell_text(row, &POINTS_CELL).ok_or(SkipReason::MissingPoints)?;
    let points = parse_points(&points_raw).ok_or_else(|| SkipReason::BadPoints(points_raw))?;

    let confederation = cell_text(row, &CONFED_CELL);

    Ok(RankingRecord {
        team_id,
        team_name,
        rank,
        points,
        confederation,
        snapshot_date,
    })
}

/// First match of `selector` under `row`, as trimmed text; `None` when the
/// cell is absent or blank.
fn cell_text(row: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = row.select(selector).next()?;
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Parse a points cell, tolerating digit-grouping commas (`"1,843.73"`).
fn parse_points(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let points: f64 = cleaned.trim().parse().ok()?;
    if points.is_finite() && points >= 0.0 {
        Some(points)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(team_id: &str, name: &str, rank: &str, points: &str) -> String {
        format!(
            r#"<tr data-team-id="{team_id}">
                <td class="fi-table__rank">{rank}</td>
                <td class="fi-table__team"><span class="fi-t__nText">{name}</span></td>
                <td class="fi-table__points">{points}</td>
                <td class="fi-table__confederation">UEFA</td>
            </tr>"#
        )
    }

    fn table(rows: &[String]) -> String {
        format!("<html><body><table><tbody>{}</tbody></table></body></html>", rows.join("\n"))
    }

    #[test]
    fn test_extract_valid_rows() {
        let markup = table(&[
            row("43935", "France", "1", "1840.76"),
            row("43924", "Belgium", "2", "1,789.0"),
        ]);
        let extraction = extract(&markup, date(2023, 6, 15));

        assert_eq!(extraction.records.len(), 2);
        assert!(extraction.skipped.is_empty());

        let first = &extraction.records[0];
        assert_eq!(first.team_id, 43935);
        assert_eq!(first.team_name, "France");
        assert_eq!(first.rank, 1);
        assert_eq!(first.points, 1840.76);
        assert_eq!(first.confederation.as_deref(), Some("UEFA"));
        assert_eq!(first.snapshot_date, date(2023, 6, 15));

        // Digit-grouping comma stripped.
        assert_eq!(extraction.records[1].points, 1789.0);
    }

    #[test]
    fn test_malformed_row_skipped_individually() {
        let markup = table(&[
            row("1", "Alpha", "1", "1800"),
            row("2", "Beta", "not-a-rank", "1750"),
            row("3", "Gamma", "3", "1700"),
        ]);
        let extraction = extract(&markup, date(2023, 1, 1));

        // One malformed row among m valid rows yields exactly m records.
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].index, 1);
        assert_eq!(
            extraction.skipped[0].reason,
            SkipReason::BadRank("not-a-rank".to_string())
        );
    }

    #[test]
    fn test_skip_reasons() {
        let no_id = r#"<tr><td class="fi-table__rank">1</td></tr>"#.to_string();
        let bad_id = row("abc", "Alpha", "1", "1800");
        let no_name = r#"<tr data-team-id="1">
            <td class="fi-table__rank">1</td>
            <td class="fi-table__points">1800</td></tr>"#
            .to_string();
        let zero_rank = row("1", "Alpha", "0", "1800");
        let bad_points = row("1", "Alpha", "1", "minus");

        let markup = table(&[no_id, bad_id, no_name, zero_rank, bad_points]);
        let extraction = extract(&markup, date(2023, 1, 1));

        assert!(extraction.records.is_empty());
        let reasons: Vec<&SkipReason> =
            extraction.skipped.iter().map(|s| &s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                &SkipReason::MissingTeamId,
                &SkipReason::BadTeamId("abc".to_string()),
                &SkipReason::MissingName,
                &SkipReason::BadRank("0".to_string()),
                &SkipReason::BadPoints("minus".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_confederation_is_none() {
        let markup = table(&[r#"<tr data-team-id="7">
            <td class="fi-table__rank">7</td>
            <td class="fi-table__team"><span class="fi-t__nText">Nowhere</span></td>
            <td class="fi-table__points">1500</td>
        </tr>"#
            .to_string()]);
        let extraction = extract(&markup, date(2023, 1, 1));

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].confederation, None);
    }

    #[test]
    fn test_no_table_yields_empty_extraction() {
        let extraction = extract("<html><body><p>maintenance</p></body></html>", date(2023, 1, 1));
        assert!(extraction.records.is_empty());
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn test_negative_points_rejected() {
        assert_eq!(parse_points("-1"), None);
        assert_eq!(parse_points("1,234"), Some(1234.0));
        assert_eq!(parse_points(" 1616.42 "), Some(1616.42));
        assert_eq!(parse_points("inf"), None);
    }
}
