/// Response validator/merger.
///
/// Walks the chunk results of one fetch attempt in chronological chunk
/// order, classifies each body, and reassembles the valid payloads into a
/// single series: header from the first valid chunk, data rows from every
/// valid chunk, rows ordered by their leading timestamp field. Rows from
/// empty, rejected, or malformed chunks never enter the series.
///
/// Ordering note: rows are compared by parsed timestamps, falling back to
/// byte comparison only when a key does not parse. The provider's
/// zero-padded formats make this identical to the historical
/// lexicographic sort, but a format change mid-range can no longer
/// silently misorder the artifact.

use crate::model::{
    parse_timestamp, row_key, ChunkResult, FetchStatus, MergedSeries, ResponseClass,
};
use std::cmp::Ordering;

/// What one merge pass saw, for diagnostics and for the fallback decision:
/// a fallback is warranted only when the merge produced nothing AND some
/// chunk rejected the request shape outright.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub series: Option<MergedSeries>,
    pub valid_chunks: usize,
    pub empty_chunks: usize,
    pub error_chunks: usize,
    pub shape_rejected: bool,
}

impl MergeReport {
    pub fn row_count(&self) -> usize {
        self.series.as_ref().map_or(0, |s| s.rows.len())
    }
}

/// Merges one attempt's chunk results using the given provider classifier.
pub fn merge_chunks<F>(results: &[ChunkResult], classify: F) -> MergeReport
where
    F: Fn(&str) -> ResponseClass,
{
    let mut header: Option<String> = None;
    let mut rows: Vec<String> = Vec::new();
    let mut valid_chunks = 0;
    let mut empty_chunks = 0;
    let mut error_chunks = 0;
    let mut shape_rejected = false;

    for result in results {
        match &result.status {
            FetchStatus::Error(_) => error_chunks += 1,
            FetchStatus::Ok(body) => match classify(body) {
                ResponseClass::Valid { header: h, rows: r } => {
                    valid_chunks += 1;
                    if header.is_none() {
                        header = Some(h);
                    }
                    rows.extend(r);
                }
                ResponseClass::Empty => empty_chunks += 1,
                ResponseClass::ShapeRejected(_) => {
                    empty_chunks += 1;
                    shape_rejected = true;
                }
                ResponseClass::Malformed(_) => error_chunks += 1,
            },
        }
    }

    // Stable sort: rows with equal timestamps keep chunk order, so reruns
    // produce byte-identical artifacts.
    rows.sort_by(|a, b| compare_rows(a, b));

    let series = match header {
        Some(header) if !rows.is_empty() => Some(MergedSeries { header, rows }),
        _ => None,
    };

    MergeReport {
        series,
        valid_chunks,
        empty_chunks,
        error_chunks,
        shape_rejected,
    }
}

/// Chronological comparison of two raw CSV rows by their leading field.
/// Unparseable keys sort after parseable ones, by byte order among
/// themselves, so the result is still a total order.
fn compare_rows(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(row_key(a)), parse_timestamp(row_key(b))) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => row_key(a).cmp(row_key(b)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::coops::classify_response;
    use crate::model::Chunk;
    use chrono::NaiveDate;

    fn chunk(m: u32) -> Chunk {
        Chunk {
            begin: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, m, 28).unwrap(),
        }
    }

    fn ok(m: u32, body: &str) -> ChunkResult {
        ChunkResult {
            chunk: chunk(m),
            status: FetchStatus::Ok(body.to_string()),
        }
    }

    const HEADER: &str = "Date Time, Water Level, Quality";

    fn csv(rows: &[&str]) -> String {
        let mut body = String::from(HEADER);
        body.push('\n');
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        body
    }

    #[test]
    fn test_header_taken_from_first_valid_chunk() {
        let results = vec![
            ok(1, " Error: No data was found. This product may not be offered at this station at the requested time."),
            ok(2, &csv(&["2024-02-01 00:00,1.1,v"])),
            ok(3, "Date Time, Water Level, Sigma\n2024-03-01 00:00,1.2,0.01\n"),
        ];
        let report = merge_chunks(&results, classify_response);
        let series = report.series.expect("should merge");
        assert_eq!(series.header, HEADER);
        assert_eq!(series.rows.len(), 2);
    }

    /// One chunk with 10 valid rows, one carrying an error sentinel — the
    /// merge contains exactly the 10 rows.
    #[test]
    fn test_sentinel_chunk_contributes_nothing() {
        let rows: Vec<String> = (0..10)
            .map(|i| format!("2024-01-{:02} 00:00,{}.0,v", i + 1, i))
            .collect();
        let row_refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let results = vec![
            ok(1, &csv(&row_refs)),
            ok(2, " Error: No data was found. This product may not be offered at this station at the requested time."),
        ];

        let report = merge_chunks(&results, classify_response);
        assert_eq!(report.valid_chunks, 1);
        assert_eq!(report.empty_chunks, 1);
        let series = report.series.expect("chunk 1 alone should merge");
        assert_eq!(series.rows.len(), 10);
        for row in &series.rows {
            assert!(row.ends_with(",v"));
        }
    }

    #[test]
    fn test_rows_sorted_chronologically_across_chunks() {
        // Rows arrive unsorted within chunks; the merge restores order.
        let results = vec![
            ok(1, &csv(&["2024-01-15 00:00,2.0,v", "2024-01-01 00:00,1.0,v"])),
            ok(2, &csv(&["2024-02-02 00:00,4.0,v", "2024-02-01 00:00,3.0,v"])),
        ];
        let report = merge_chunks(&results, classify_response);
        let series = report.series.unwrap();
        let keys: Vec<&str> = series.rows.iter().map(|r| row_key(r)).collect();
        assert_eq!(
            keys,
            vec![
                "2024-01-01 00:00",
                "2024-01-15 00:00",
                "2024-02-01 00:00",
                "2024-02-02 00:00"
            ]
        );
        for pair in series.rows.windows(2) {
            assert!(
                row_key(&pair[0]) <= row_key(&pair[1]),
                "output must be monotonic: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_transport_error_chunk_is_counted_and_skipped() {
        let results = vec![
            ChunkResult {
                chunk: chunk(1),
                status: FetchStatus::Error("connection refused".to_string()),
            },
            ok(2, &csv(&["2024-02-01 00:00,1.0,v"])),
        ];
        let report = merge_chunks(&results, classify_response);
        assert_eq!(report.error_chunks, 1);
        assert_eq!(report.row_count(), 1);
    }

    #[test]
    fn test_all_empty_merge_is_none() {
        let results = vec![
            ok(1, ""),
            ChunkResult {
                chunk: chunk(2),
                status: FetchStatus::Error("timeout".to_string()),
            },
        ];
        let report = merge_chunks(&results, classify_response);
        assert!(report.series.is_none());
        assert_eq!(report.row_count(), 0);
    }

    #[test]
    fn test_shape_rejection_sets_fallback_flag() {
        let results = vec![ok(
            1,
            " Error: No Predictions data was found. Please make sure the Datum input is valid.",
        )];
        let report = merge_chunks(&results, classify_response);
        assert!(report.shape_rejected);
        assert!(report.series.is_none());
    }

    #[test]
    fn test_generic_no_data_does_not_set_fallback_flag() {
        let results = vec![ok(
            1,
            " Error: No data was found. This product may not be offered at this station at the requested time.",
        )];
        let report = merge_chunks(&results, classify_response);
        assert!(!report.shape_rejected);
    }

    #[test]
    fn test_header_only_chunks_yield_no_series() {
        // A header with no data rows is Empty; no artifact should follow.
        let results = vec![ok(1, "Date Time, Water Level, Quality\n")];
        let report = merge_chunks(&results, classify_response);
        assert!(report.series.is_none());
        assert_eq!(report.empty_chunks, 1);
    }
}
