/// NOAA CO-OPS Data API client: URL construction + response classification.
///
/// Retrieves tidal and meteorological time series from the Tides & Currents
/// data getter endpoint:
///   https://api.tidesandcurrents.noaa.gov/api/prod/datagetter
///
/// The API returns CSV on success, but semantic failures arrive as
/// human-readable text inside a 200-OK body ("No data was found...",
/// "No Predictions...", datum complaints). `classify_response` is the one
/// place those sentinels are recognized; nothing else in the crate matches
/// on response text. See `fixtures.rs` for representative payloads.

use crate::model::{Chunk, ResponseClass};
use crate::products::{Product, RequestShape};

pub const API_BASE: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// Client identifier sent as the CO-OPS `application` parameter, as the
/// provider's usage guidelines request.
pub const APPLICATION: &str = "tidefetch_service";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the data-getter URL for one chunk of one (station, product)
/// request under a given shape.
///
/// All requests ask for GMT timestamps, metric units, and CSV format so
/// chunk bodies from different ranges concatenate cleanly. The datum is
/// included only for water-level-family shapes and the interval only for
/// predictions.
pub fn build_url(station: &str, product: Product, shape: &RequestShape, chunk: &Chunk) -> String {
    let mut url = format!(
        "{}?station={}&product={}&begin_date={}&end_date={}&time_zone=gmt&units=metric&format=csv&application={}",
        API_BASE,
        urlencoding::encode(station),
        product.name(),
        chunk.begin_param(),
        chunk.end_param(),
        APPLICATION,
    );
    if let Some(datum) = &shape.datum {
        url.push_str("&datum=");
        url.push_str(&urlencoding::encode(datum));
    }
    if let Some(interval) = shape.interval {
        url.push_str("&interval=");
        url.push_str(interval);
    }
    url
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// How many leading characters to scan for embedded error text. Error
/// bodies put their message first; a real CSV body may legitimately
/// contain the word "error" in a column name further down.
const ERROR_SCAN_CHARS: usize = 500;

/// Classifies a 200-OK response body.
///
/// Precedence: shape rejections ("No Predictions", datum complaints) are
/// recognized before the generic no-data sentinel, because a rejected
/// shape is the signal that arms the fallback attempt while plain no-data
/// is terminal for the chunk.
pub fn classify_response(text: &str) -> ResponseClass {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ResponseClass::Empty;
    }

    let head: String = trimmed
        .chars()
        .take(ERROR_SCAN_CHARS)
        .collect::<String>()
        .to_lowercase();

    if head.contains("no predictions") {
        return ResponseClass::ShapeRejected("station publishes no predictions at this interval".into());
    }
    if head.contains("error") {
        if head.contains("datum") {
            return ResponseClass::ShapeRejected("datum not accepted by this station".into());
        }
        if head.contains("no data") {
            return ResponseClass::Empty;
        }
        return ResponseClass::Malformed(first_line(trimmed).to_string());
    }
    if trimmed.starts_with('<') || head.contains("<html") {
        return ResponseClass::Malformed("markup where CSV was expected".into());
    }

    let mut lines = trimmed.lines().map(|l| l.trim_end_matches('\r'));
    let header = match lines.next() {
        Some(h) if looks_like_header(h) => h.to_string(),
        Some(h) => return ResponseClass::Malformed(format!("unrecognized header: {}", h)),
        None => return ResponseClass::Empty,
    };

    let rows: Vec<String> = lines
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.to_string())
        .collect();

    if rows.is_empty() {
        return ResponseClass::Empty;
    }
    ResponseClass::Valid { header, rows }
}

/// CO-OPS CSV headers lead with a "Date Time" or "Date" column; the
/// monthly statistics products lead with "Year, Month".
fn looks_like_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("date time")
        || lower.contains("date_time")
        || lower.starts_with("date")
        || lower.starts_with("year")
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
