//! JSON persistence for the assembled dataset.

use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::Dataset;

/// Write a [`Dataset`] to a JSON file under `json_output_dir`.
///
/// The filename covers the snapshot-date span of the dataset
/// (`rankings_<earliest>_<latest>.json`); an empty dataset is written as
/// `rankings_empty.json` so "no data available" is still an observable
/// artifact.
///
/// # Returns
///
/// The path written, or an error if directory creation or writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_dataset(
    dataset: &Dataset,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(dataset)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON output dir");
        return Err(e.into());
    }

    let dates = dataset.snapshot_dates();
    let stem = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("rankings_{first}_{last}"),
        _ => "rankings_empty".to_string(),
    };
    let path = format!("{}/{}.json", json_output_dir.trim_end_matches('/'), stem);

    info!(path = %path, records = dataset.len(), "Writing dataset JSON");
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote dataset JSON file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankingRecord;
    use chrono::NaiveDate;

    fn record(rank: u32, d: NaiveDate) -> RankingRecord {
        RankingRecord {
            team_id: rank,
            team_name: format!("Team {rank}"),
            rank,
            points: 1800.0 - rank as f64,
            confederation: None,
            snapshot_date: d,
        }
    }

    #[tokio::test]
    async fn test_write_dataset_names_file_by_date_span() {
        let dir = std::env::temp_dir().join("fifa_rank_scraper_json_test");
        let dir_str = dir.to_str().unwrap().to_string();

        let dataset = Dataset {
            records: vec![
                record(1, NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()),
                record(1, NaiveDate::from_ymd_opt(2023, 12, 21).unwrap()),
            ],
        };
        let path = write_dataset(&dataset, &dir_str).await.unwrap();
        assert!(path.ends_with("rankings_2023-06-15_2023-12-21.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let back: Dataset = serde_json::from_str(&written).unwrap();
        assert_eq!(back, dataset);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_write_empty_dataset() {
        let dir = std::env::temp_dir().join("fifa_rank_scraper_json_empty_test");
        let dir_str = dir.to_str().unwrap().to_string();

        let path = write_dataset(&Dataset::default(), &dir_str).await.unwrap();
        assert!(path.ends_with("rankings_empty.json"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
