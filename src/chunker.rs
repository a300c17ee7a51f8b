/// Date-range chunker.
///
/// Splits a [begin, end] span into contiguous, non-overlapping chunks no
/// longer than a product's request window, covering the span exactly once.
/// Month and year windows are calendar-aligned: a monthly chunk ends on
/// the last day of its final calendar month, a yearly chunk on 31 December
/// of its final year, so chunk boundaries never drift across variable
/// month lengths or year boundaries. Day windows use a fixed day count.

use crate::model::Chunk;
use chrono::{Datelike, Duration, Months, NaiveDate};

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Maximum span of a single provider request for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkWindow {
    /// Fixed-length windows of exactly `n` days (inclusive).
    Days(u32),
    /// Calendar windows ending on the last day of the `n`-th month.
    Months(u32),
    /// Calendar windows ending on 31 December of the `n`-th year.
    Years(u32),
}

impl ChunkWindow {
    /// The last day a chunk starting at `begin` may cover under this window.
    fn span_end(&self, begin: NaiveDate) -> NaiveDate {
        match *self {
            ChunkWindow::Days(n) => begin + Duration::days(i64::from(n.max(1)) - 1),
            ChunkWindow::Months(n) => {
                let month_start = NaiveDate::from_ymd_opt(begin.year(), begin.month(), 1)
                    .expect("first day of a known month is always valid");
                month_start + Months::new(n.max(1)) - Duration::days(1)
            }
            ChunkWindow::Years(n) => {
                NaiveDate::from_ymd_opt(begin.year() + n.max(1) as i32 - 1, 12, 31)
                    .expect("december 31 is always valid")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Produces the ordered chunk plan covering [begin, end] exactly once.
///
/// `begin > end` yields an empty plan (zero fetches downstream);
/// `begin == end` yields one single-day chunk. The last chunk may be
/// shorter than the window.
pub fn chunk_plan(begin: NaiveDate, end: NaiveDate, window: ChunkWindow) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut cursor = begin;
    while cursor <= end {
        let chunk_end = window.span_end(cursor).min(end);
        chunks.push(Chunk {
            begin: cursor,
            end: chunk_end,
        });
        cursor = chunk_end + Duration::days(1);
    }
    chunks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
