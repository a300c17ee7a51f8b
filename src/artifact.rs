/// Idempotent output gate and artifact writer.
///
/// One CSV artifact per (station, product). The gate is checked before any
/// network activity: an existing artifact short-circuits the whole chunk
/// plan unless the run is forced, which makes a batch safely resumable at
/// artifact granularity — a killed run leaves no partial file, and the
/// next run redoes interrupted stations from scratch. Artifacts are
/// written in one pass after all chunks resolve and are never mutated in
/// place.

use crate::model::MergedSeries;
use crate::products::Product;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Destination of one (station, product) series: `<dir>/<station>_<product>.csv`.
pub fn artifact_path(output_dir: &Path, station: &str, product: Product) -> PathBuf {
    output_dir.join(format!("{}_{}.csv", station, product.name()))
}

/// Destination of one station's VTEC event history.
pub fn vtec_artifact_path(output_dir: &Path, station: &str) -> PathBuf {
    output_dir.join(format!("vtec_events_{}.csv", station))
}

/// Skip-existing / force-overwrite policy for a batch run.
#[derive(Debug, Clone, Copy)]
pub struct OutputGate {
    pub skip_existing: bool,
}

impl OutputGate {
    /// True when the artifact already exists and this run honors existing
    /// files. Checked before the first fetch for the unit of work.
    pub fn should_skip(&self, path: &Path) -> bool {
        self.skip_existing && path.is_file()
    }
}

/// Writes header + rows as the complete artifact, creating the output
/// directory if needed. Overwrites any previous content in full.
pub fn write_rows(path: &Path, header: &str, rows: &[String]) -> io::Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut body = String::with_capacity(header.len() + rows.iter().map(|r| r.len() + 1).sum::<usize>() + 1);
    body.push_str(header);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(path, body)?;
    Ok(rows.len())
}

/// Writes a merged series as its artifact; returns the row count.
pub fn write_series(path: &Path, series: &MergedSeries) -> io::Result<usize> {
    write_rows(path, &series.header, &series.rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_naming_matches_station_and_product() {
        let dir = Path::new("/data/noaa");
        assert_eq!(
            artifact_path(dir, "8454000", Product::WaterLevel),
            PathBuf::from("/data/noaa/8454000_water_level.csv")
        );
        assert_eq!(
            artifact_path(dir, "8452660", Product::Predictions),
            PathBuf::from("/data/noaa/8452660_predictions.csv")
        );
        assert_eq!(
            vtec_artifact_path(dir, "8454000"),
            PathBuf::from("/data/noaa/vtec_events_8454000.csv")
        );
    }

    #[test]
    fn test_gate_skips_only_existing_files() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("8454000_water_level.csv");
        fs::write(&existing, "Date Time, Water Level\n").unwrap();
        let missing = tmp.path().join("8452660_water_level.csv");

        let gate = OutputGate { skip_existing: true };
        assert!(gate.should_skip(&existing));
        assert!(!gate.should_skip(&missing));
    }

    #[test]
    fn test_forced_gate_never_skips() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("8454000_water_level.csv");
        fs::write(&existing, "old").unwrap();

        let gate = OutputGate { skip_existing: false };
        assert!(!gate.should_skip(&existing));
    }

    #[test]
    fn test_write_series_emits_header_then_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("8454000_water_level.csv");
        let series = MergedSeries {
            header: "Date Time, Water Level, Quality".to_string(),
            rows: vec![
                "2024-01-01 00:00,1.214,v".to_string(),
                "2024-01-01 00:06,1.190,v".to_string(),
            ],
        };

        let written = write_series(&path, &series).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Date Time, Water Level, Quality\n2024-01-01 00:00,1.214,v\n2024-01-01 00:06,1.190,v\n"
        );
    }

    #[test]
    fn test_write_replaces_previous_content_entirely() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("8454000_water_level.csv");
        fs::write(&path, "stale content that is much longer than the replacement\n").unwrap();

        let series = MergedSeries {
            header: "Date Time, Water Level".to_string(),
            rows: vec!["2024-01-01 00:00,1.0".to_string()],
        };
        write_series(&path, &series).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Date Time, Water Level\n2024-01-01 00:00,1.0\n");
    }

    #[test]
    fn test_write_creates_missing_output_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("8454000_wind.csv");
        let series = MergedSeries {
            header: "Date Time, Speed".to_string(),
            rows: vec!["2024-01-01 00:00,4.2".to_string()],
        };
        assert!(write_series(&path, &series).is_ok());
        assert!(path.is_file());
    }
}
