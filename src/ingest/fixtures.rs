/// Test fixtures: representative response bodies from the CO-OPS data
/// getter and the IEM VTEC endpoint.
///
/// These are structurally faithful but truncated to the minimum needed to
/// exercise classification and parsing. The CO-OPS API signals semantic
/// failure inside 200-OK bodies, so the error fixtures below are exactly
/// what a "successful" HTTP fetch can hand the classifier.

/// Observed water level CSV: header plus four 6-minute samples, the shape
/// returned for product=water_level&format=csv.
#[cfg(test)]
pub(crate) fn fixture_water_level_csv() -> &'static str {
    "Date Time, Water Level, Sigma, O or I (for verified), F, R, L, Quality\n\
     2024-01-01 00:00,1.214,0.003,0,0,0,0,v\n\
     2024-01-01 00:06,1.190,0.004,0,0,0,0,v\n\
     2024-01-01 00:12,1.166,0.003,0,0,0,0,v\n\
     2024-01-01 00:18,1.142,0.005,0,0,0,0,p\n"
}

/// Generic no-data sentinel: 200 OK, but the range/product combination has
/// nothing. Must classify as Empty, not as an error.
#[cfg(test)]
pub(crate) fn fixture_no_data_error() -> &'static str {
    " Error: No data was found. This product may not be offered at this station at the requested time.\n"
}

/// Shape rejection from a subordinate tide station: 6-minute predictions
/// are not published there, only high/low events. Must classify as
/// ShapeRejected so the engine re-plans under interval=hilo.
#[cfg(test)]
pub(crate) fn fixture_no_predictions_error() -> &'static str {
    " Error: No Predictions data was found. Please make sure the Datum input is valid.\n"
}

/// Datum complaint: the station does not accept the requested datum.
#[cfg(test)]
pub(crate) fn fixture_datum_error() -> &'static str {
    " Error: The supported Datum values are: MHHW, MHW, MTL, MSL, MLW, MLLW and STND\n"
}

/// An HTML error page where CSV was expected (gateway hiccups render one).
#[cfg(test)]
pub(crate) fn fixture_html_error_page() -> &'static str {
    "<html><head><title>502 Bad Gateway</title></head>\n<body>upstream unavailable</body></html>"
}

/// High/low predictions CSV as returned under interval=hilo: coarser rows,
/// a type column instead of sigma/quality.
#[cfg(test)]
pub(crate) fn fixture_hilo_predictions_csv() -> &'static str {
    "Date Time, Prediction, Type\n\
     2024-01-01 03:12,1.402,H\n\
     2024-01-01 09:30,0.112,L\n\
     2024-01-01 15:36,1.377,H\n"
}

/// VTEC by-point response: one fully-named coastal flood warning and one
/// event carrying only the split phenomena/significance names.
#[cfg(test)]
pub(crate) fn fixture_vtec_events_json() -> &'static str {
    r#"{
      "events": [
        {
          "wfo": "BOX",
          "phenomena": "CF",
          "significance": "W",
          "eventid": 12,
          "issue": "2018-03-02T10:15:00Z",
          "expire": "2018-03-03T01:00:00Z",
          "name": "Coastal Flood Warning",
          "ph_name": "Coastal Flood",
          "sig_name": "Warning"
        },
        {
          "wfo": "BOX",
          "phenomena": "HW",
          "significance": "A",
          "eventid": 3,
          "issue": "2019-10-16T19:32:00Z",
          "expire": "2019-10-17T12:00:00Z",
          "ph_name": "High Wind",
          "sig_name": "Watch"
        }
      ]
    }"#
}
