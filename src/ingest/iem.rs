/// IEM (Iowa Environmental Mesonet) VTEC events client.
///
/// Retrieves NWS Watch/Warning/Advisory (VTEC) event histories by point
/// for each station in the registry, using the same ~1-mile buffer as the
/// manual point selection on the IEM VTEC search page.
///
/// API: https://mesonet.agron.iastate.edu/json/vtec_events_bypoint.py

use serde::Deserialize;

const IEM_BASE_URL: &str = "https://mesonet.agron.iastate.edu";

/// Approximate Location Buffer Radius in degrees (~1 mile).
pub const VTEC_BUFFER_DEG: f64 = 0.01;

/// Header of the per-station VTEC artifact.
pub const VTEC_CSV_HEADER: &str = "STAID,phenomena,significance,warning_name,issued,expired";

// ============================================================================
// IEM API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VtecEventsResponse {
    pub events: Vec<VtecEvent>,
}

/// One VTEC event as returned by the by-point endpoint. Field coverage
/// varies by event age, so everything beyond the VTEC code pair and the
/// issue/expire times is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct VtecEvent {
    /// Two-letter VTEC phenomena code (e.g. "CF" coastal flood).
    pub phenomena: String,
    /// One-letter VTEC significance code (e.g. "W" warning, "A" watch).
    pub significance: String,
    /// Issuance time, ISO 8601.
    #[serde(alias = "issued")]
    pub issue: String,
    /// Expiration time, ISO 8601.
    #[serde(alias = "expired")]
    pub expire: String,
    /// Pre-composed event name, when the API provides one.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ph_name: Option<String>,
    #[serde(default)]
    pub sig_name: Option<String>,
}

impl VtecEvent {
    /// Human-readable event name: the API's own name when present, the
    /// phenomena/significance names joined when not, the raw code pair
    /// as a last resort.
    pub fn warning_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.ph_name, &self.sig_name) {
            (Some(ph), Some(sig)) => format!("{} {}", ph, sig),
            _ => format!("{}.{}", self.phenomena, self.significance),
        }
    }

    /// One CSV row of the per-station VTEC artifact.
    pub fn csv_row(&self, station_id: &str) -> String {
        format!(
            "{},{},{},{},{},{}",
            station_id,
            self.phenomena,
            self.significance,
            self.warning_name(),
            self.issue,
            self.expire
        )
    }
}

// ============================================================================
// URL construction and parsing
// ============================================================================

/// Builds the by-point VTEC query for one station location and date range
/// (dates in `YYYY-MM-DD`).
pub fn build_vtec_url(lat: f64, lon: f64, sdate: &str, edate: &str) -> String {
    format!(
        "{}/json/vtec_events_bypoint.py?lat={}&lon={}&buffer={}&sdate={}&edate={}",
        IEM_BASE_URL,
        lat,
        lon,
        VTEC_BUFFER_DEG,
        urlencoding::encode(sdate),
        urlencoding::encode(edate),
    )
}

/// Parses the JSON event list out of a by-point response body.
pub fn parse_vtec_response(json: &str) -> Result<Vec<VtecEvent>, serde_json::Error> {
    let response: VtecEventsResponse = serde_json::from_str(json)?;
    Ok(response.events)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    #[test]
    fn test_build_vtec_url_includes_point_and_buffer() {
        let url = build_vtec_url(41.8071, -71.4012, "1986-01-01", "2025-12-31");
        assert!(url.contains("vtec_events_bypoint.py"));
        assert!(url.contains("lat=41.8071"));
        assert!(url.contains("lon=-71.4012"));
        assert!(url.contains("buffer=0.01"));
        assert!(url.contains("sdate=1986-01-01"));
        assert!(url.contains("edate=2025-12-31"));
    }

    #[test]
    fn test_parse_vtec_events() {
        let events = parse_vtec_response(fixture_vtec_events_json())
            .expect("valid fixture should parse");
        assert_eq!(events.len(), 2);

        let flood = &events[0];
        assert_eq!(flood.phenomena, "CF");
        assert_eq!(flood.significance, "W");
        assert!(flood.issue.starts_with("2018-03-02"));
    }

    #[test]
    fn test_warning_name_prefers_api_name() {
        let events = parse_vtec_response(fixture_vtec_events_json()).unwrap();
        assert_eq!(events[0].warning_name(), "Coastal Flood Warning");
        // Second event has no name field; falls back to ph_name + sig_name.
        assert_eq!(events[1].warning_name(), "High Wind Watch");
    }

    #[test]
    fn test_warning_name_last_resort_is_code_pair() {
        let event = VtecEvent {
            phenomena: "GL".to_string(),
            significance: "A".to_string(),
            issue: "2020-01-01T00:00:00Z".to_string(),
            expire: "2020-01-02T00:00:00Z".to_string(),
            name: None,
            ph_name: None,
            sig_name: None,
        };
        assert_eq!(event.warning_name(), "GL.A");
    }

    #[test]
    fn test_csv_row_leads_with_station_id() {
        let events = parse_vtec_response(fixture_vtec_events_json()).unwrap();
        let row = events[0].csv_row("8454000");
        assert!(row.starts_with("8454000,CF,W,Coastal Flood Warning,"));
        assert_eq!(row.split(',').count(), VTEC_CSV_HEADER.split(',').count());
    }

    #[test]
    fn test_parse_malformed_json_is_an_error() {
        assert!(parse_vtec_response("{ nope }").is_err());
        assert!(parse_vtec_response("").is_err());
    }
}
