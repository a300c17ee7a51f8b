/// JSON export for the map front end.
///
/// Reads each station's water level and predictions artifacts and emits
/// the chart-ready document the viewer consumes: per station, daily
/// observed points split into verified vs preliminary by the quality
/// column, the tide prediction series, and the observed-minus-predicted
/// residual. The first CSV column is parsed as a date and the value
/// column as a float; cells that parse as neither are nulls and never
/// become chart points.

use crate::artifact;
use crate::cache::SeriesCache;
use crate::config::StationConfig;
use crate::model::parse_timestamp;
use crate::products::Product;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

// ---------------------------------------------------------------------------
// Parsed artifact rows
// ---------------------------------------------------------------------------

/// One artifact row reduced to what the viewer needs: the calendar date,
/// the value (None when the cell is unparseable), and the quality flag
/// ("p" preliminary / "v" verified) when the artifact carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub date: String,
    pub value: Option<f64>,
    pub quality: Option<String>,
}

/// Parses an artifact body into rows. Rows whose timestamp does not parse
/// are dropped entirely — they cannot be placed on a time axis. The value
/// column is the second CSV field; the quality column is located from the
/// header when present.
pub fn parse_artifact_rows(content: &str) -> Vec<ParsedRow> {
    let mut lines = content.lines();
    let header = match lines.next() {
        Some(h) => h,
        None => return Vec::new(),
    };
    let quality_idx = header
        .split(',')
        .position(|col| col.trim().eq_ignore_ascii_case("quality"));

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let timestamp = match parse_timestamp(fields[0]) {
            Some(ts) => ts,
            None => continue,
        };
        let value = fields.get(1).and_then(|v| v.trim().parse::<f64>().ok());
        let quality = quality_idx
            .and_then(|idx| fields.get(idx))
            .map(|q| q.trim().to_lowercase());

        rows.push(ParsedRow {
            date: timestamp.format("%Y-%m-%d").to_string(),
            value,
            quality,
        });
    }
    rows
}

// ---------------------------------------------------------------------------
// Export document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct StationWaterLevel {
    pub verified: Vec<SeriesPoint>,
    pub preliminary: Vec<SeriesPoint>,
    pub predictions: Vec<SeriesPoint>,
    pub residual: Vec<SeriesPoint>,
}

/// The whole export: station ID → series. BTreeMap keeps the JSON output
/// stable across runs.
#[derive(Debug, Default, Serialize)]
pub struct WaterLevelExport {
    pub series: BTreeMap<String, StationWaterLevel>,
}

/// Builds one station's series block from its parsed artifacts. Returns
/// None when there is nothing to chart.
pub fn build_station_series(
    observed: &[ParsedRow],
    predictions: &[ParsedRow],
) -> Option<StationWaterLevel> {
    let mut block = StationWaterLevel::default();

    for row in observed {
        let value = match row.value {
            Some(v) => v,
            None => continue,
        };
        let point = SeriesPoint {
            date: row.date.clone(),
            value,
        };
        if row.quality.as_deref() == Some("p") {
            block.preliminary.push(point);
        } else {
            block.verified.push(point);
        }
    }

    for row in predictions {
        if let Some(value) = row.value {
            block.predictions.push(SeriesPoint {
                date: row.date.clone(),
                value,
            });
        }
    }

    // Residual: observed minus predicted on days both series cover,
    // first sample per day on each side.
    let mut pred_by_date: BTreeMap<&str, f64> = BTreeMap::new();
    for point in &block.predictions {
        pred_by_date.entry(point.date.as_str()).or_insert(point.value);
    }
    let mut seen_dates = std::collections::HashSet::new();
    for point in block.verified.iter().chain(&block.preliminary) {
        if !seen_dates.insert(point.date.as_str()) {
            continue;
        }
        if let Some(pred) = pred_by_date.get(point.date.as_str()) {
            block.residual.push(SeriesPoint {
                date: point.date.clone(),
                value: ((point.value - pred) * 10_000.0).round() / 10_000.0,
            });
        }
    }
    block.residual.sort_by(|a, b| a.date.cmp(&b.date));

    if block.verified.is_empty()
        && block.preliminary.is_empty()
        && block.predictions.is_empty()
        && block.residual.is_empty()
    {
        None
    } else {
        Some(block)
    }
}

/// Assembles the export document for every station with a water level
/// artifact, reloading parsed artifacts only when their mtimes change.
pub fn build_export(
    stations: &[StationConfig],
    input_dir: &Path,
    cache: &mut SeriesCache<Vec<ParsedRow>>,
) -> WaterLevelExport {
    let mut export = WaterLevelExport::default();

    for station in stations {
        let wl_path = artifact::artifact_path(input_dir, &station.id, Product::WaterLevel);
        let observed = match load_cached_rows(cache, &wl_path) {
            Some(rows) => rows,
            None => continue, // no water level artifact for this station
        };

        let pred_path = artifact::artifact_path(input_dir, &station.id, Product::Predictions);
        let predictions = load_cached_rows(cache, &pred_path).unwrap_or_default();

        if let Some(block) = build_station_series(&observed, &predictions) {
            export.series.insert(station.id.clone(), block);
        }
    }

    export
}

fn load_cached_rows(cache: &mut SeriesCache<Vec<ParsedRow>>, path: &Path) -> Option<Vec<ParsedRow>> {
    let mtime = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    match cache.refresh_if_stale(path, mtime, || {
        fs::read_to_string(path).map(|content| parse_artifact_rows(&content))
    }) {
        Ok(rows) => Some(rows.clone()),
        Err(e) => {
            eprintln!("  {}: read failed: {}", path.display(), e);
            None
        }
    }
}

/// Writes the export document as pretty-printed JSON.
pub fn write_export(path: &Path, export: &WaterLevelExport) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(export)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVED: &str = "Date Time, Water Level, Sigma, Quality\n\
        2024-01-01 00:00,1.214,0.003,v\n\
        2024-01-01 06:00,1.190,0.004,p\n\
        2024-01-02 00:00,bad,0.003,v\n\
        2024-01-03 00:00,1.050,0.002,v\n\
        garbage timestamp,1.0,0.001,v\n";

    const PREDICTIONS: &str = "Date Time, Prediction\n\
        2024-01-01 00:00,1.100\n\
        2024-01-03 00:00,1.000\n";

    #[test]
    fn test_parse_rows_nulls_unparseable_values() {
        let rows = parse_artifact_rows(OBSERVED);
        // The garbage-timestamp row is dropped; the bad-value row survives
        // with a null value.
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].date, "2024-01-02");
        assert_eq!(rows[2].value, None);
        assert_eq!(rows[0].value, Some(1.214));
    }

    #[test]
    fn test_parse_rows_locates_quality_column_from_header() {
        let rows = parse_artifact_rows(OBSERVED);
        assert_eq!(rows[0].quality.as_deref(), Some("v"));
        assert_eq!(rows[1].quality.as_deref(), Some("p"));

        let no_quality = parse_artifact_rows(PREDICTIONS);
        assert_eq!(no_quality[0].quality, None);
    }

    #[test]
    fn test_station_series_splits_verified_and_preliminary() {
        let observed = parse_artifact_rows(OBSERVED);
        let predictions = parse_artifact_rows(PREDICTIONS);
        let block = build_station_series(&observed, &predictions).expect("has data");

        assert_eq!(block.verified.len(), 2); // null-valued row excluded
        assert_eq!(block.preliminary.len(), 1);
        assert_eq!(block.predictions.len(), 2);
    }

    #[test]
    fn test_residual_is_observed_minus_predicted() {
        let observed = parse_artifact_rows(OBSERVED);
        let predictions = parse_artifact_rows(PREDICTIONS);
        let block = build_station_series(&observed, &predictions).unwrap();

        assert_eq!(
            block.residual,
            vec![
                SeriesPoint {
                    date: "2024-01-01".to_string(),
                    value: 0.114
                },
                SeriesPoint {
                    date: "2024-01-03".to_string(),
                    value: 0.05
                },
            ]
        );
    }

    #[test]
    fn test_empty_artifacts_produce_no_block() {
        assert!(build_station_series(&[], &[]).is_none());
    }

    #[test]
    fn test_export_round_trips_through_cache() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        let wl = artifact::artifact_path(tmp.path(), "8454000", Product::WaterLevel);
        fs::write(&wl, OBSERVED).unwrap();

        let stations = vec![StationConfig {
            id: "8454000".to_string(),
            name: "Providence, RI".to_string(),
            latitude: 41.8071,
            longitude: -71.4012,
        }];

        let mut cache = SeriesCache::new();
        let export = build_export(&stations, tmp.path(), &mut cache);
        assert!(export.series.contains_key("8454000"));
        assert_eq!(cache.len(), 1, "water level artifact should be cached");

        let out = tmp.path().join("water_level_data.json");
        write_export(&out, &export).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("\"verified\""));
        assert!(written.contains("\"8454000\""));
    }
}
