/// Shared data types for the chunked download pipeline.
///
/// The pipeline stages hand each other explicit result types rather than
/// swallowing failures: a transport problem becomes `FetchStatus::Error`,
/// a provider sentinel becomes a `ResponseClass` variant, and the merge
/// step reports what it dropped. Nothing in this module performs I/O.

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Chunks
// ---------------------------------------------------------------------------

/// One bounded sub-range of a download's date span, sized to respect the
/// provider's per-request window for the product being fetched. Both ends
/// are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl Chunk {
    /// Begin date in the CO-OPS `yyyyMMdd` query format.
    pub fn begin_param(&self) -> String {
        self.begin.format("%Y%m%d").to_string()
    }

    /// End date in the CO-OPS `yyyyMMdd` query format.
    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

// ---------------------------------------------------------------------------
// Fetch results
// ---------------------------------------------------------------------------

/// Outcome of exactly one fetch attempt for one chunk. Transport failures,
/// timeouts, and non-2xx statuses all land in `Error` — the fetch unit
/// never raises past its boundary, and an errored chunk is terminal (no
/// per-chunk retry; only the shape-level fallback re-plans).
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    /// HTTP success; body text as returned (may still carry a sentinel).
    Ok(String),
    /// Transport error, timeout, or non-2xx status.
    Error(String),
}

/// A chunk paired with the result of its single fetch attempt.
#[derive(Debug, Clone)]
pub struct ChunkResult {
    pub chunk: Chunk,
    pub status: FetchStatus,
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// Classification of a 200-OK response body. The CO-OPS API embeds
/// human-readable error text in successful HTTP responses, so status codes
/// alone cannot distinguish data from rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseClass {
    /// A CSV payload with a recognizable header line and at least one
    /// data row.
    Valid { header: String, rows: Vec<String> },
    /// The provider had no data for this range (generic "No data" sentinel
    /// or a header with no rows).
    Empty,
    /// The request shape itself was rejected (e.g. "No Predictions" for an
    /// unsupported interval, or a datum the station does not accept).
    /// Distinct from `Empty`: this is what arms the fallback attempt.
    ShapeRejected(String),
    /// Markup or other non-CSV content where a table was expected. The
    /// chunk is dropped and treated as empty downstream.
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Merged series
// ---------------------------------------------------------------------------

/// The reassembled series for one (station, product): the header captured
/// from the first valid chunk, and all valid data rows in chronological
/// order. Rows are kept as raw CSV lines; only the leading timestamp field
/// is interpreted, for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSeries {
    pub header: String,
    pub rows: Vec<String>,
}

/// Which request shape produced the written artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeUsed {
    Primary,
    Fallback,
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Parses the leading timestamp field of a CO-OPS CSV row. The API emits
/// "2024-01-01 00:00" for sub-daily products, occasionally with seconds,
/// and bare dates for daily/monthly products.
pub fn parse_timestamp(field: &str) -> Option<NaiveDateTime> {
    let s = field.trim();
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// The timestamp field of a raw CSV row: everything before the first comma.
pub fn row_key(row: &str) -> &str {
    match row.find(',') {
        Some(idx) => &row[..idx],
        None => row,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_params_use_coops_date_format() {
        let chunk = Chunk {
            begin: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert_eq!(chunk.begin_param(), "20240101");
        assert_eq!(chunk.end_param(), "20240131");
    }

    #[test]
    fn test_parse_timestamp_minute_resolution() {
        let dt = parse_timestamp("2024-03-02 13:42").expect("should parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-03-02 13:42");
    }

    #[test]
    fn test_parse_timestamp_with_seconds() {
        let dt = parse_timestamp("2024-03-02 13:42:30").expect("should parse");
        assert_eq!(dt.format("%H:%M:%S").to_string(), "13:42:30");
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let dt = parse_timestamp("2024-03-02").expect("should parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-03-02 00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_row_key_takes_first_field() {
        assert_eq!(row_key("2024-01-01 00:00,1.234,0.01,1,v"), "2024-01-01 00:00");
        assert_eq!(row_key("no-commas-here"), "no-commas-here");
    }
}
