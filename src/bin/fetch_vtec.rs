//! Download NWS VTEC event histories for every station in stations.toml.
//!
//! Queries the IEM VTEC by-point API at each station's coordinates with a
//! ~1-mile buffer and writes one `vtec_events_<station>.csv` per station
//! through the same skip-existing gate as the CO-OPS downloader. The VTEC
//! API accepts the full date range in a single request, so there is no
//! chunk plan here.
//!
//! Usage:
//!   cargo run --bin fetch_vtec -- [--output-dir DIR] [--sdate YYYY-MM-DD]
//!                                 [--edate YYYY-MM-DD] [--force]

use std::env;
use std::path::PathBuf;
use std::process;

use tidefetch_service::artifact::{self, OutputGate};
use tidefetch_service::config;
use tidefetch_service::fetch;
use tidefetch_service::ingest::iem;
use tidefetch_service::model::FetchStatus;

fn main() {
    dotenv::dotenv().ok();

    let mut output_dir = env::var("TIDEFETCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("noaa"));
    let mut sdate = "1986-01-01".to_string();
    let mut edate = "2025-12-31".to_string();
    let mut skip_existing = true;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output-dir" if i + 1 < args.len() => {
                output_dir = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--sdate" if i + 1 < args.len() => {
                sdate = args[i + 1].clone();
                i += 2;
            }
            "--edate" if i + 1 < args.len() => {
                edate = args[i + 1].clone();
                i += 2;
            }
            "--force" => {
                skip_existing = false;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!(
                    "Usage: {} [--output-dir DIR] [--sdate YYYY-MM-DD] [--edate YYYY-MM-DD] [--force]",
                    args[0]
                );
                process::exit(1);
            }
        }
    }

    let stations = config::load_config();
    println!(
        "VTEC events | {} stations | {} to {} | buffer {} deg",
        stations.len(),
        sdate,
        edate,
        iem::VTEC_BUFFER_DEG
    );

    let client = match fetch::build_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            process::exit(1);
        }
    };
    let gate = OutputGate { skip_existing };

    let mut written = 0;
    for station in &stations {
        let path = artifact::vtec_artifact_path(&output_dir, &station.id);
        if gate.should_skip(&path) {
            println!("  {}: skipped (exists)", station.id);
            continue;
        }

        let url = iem::build_vtec_url(station.latitude, station.longitude, &sdate, &edate);
        let body = match fetch::fetch_text(&client, &url) {
            FetchStatus::Ok(body) => body,
            FetchStatus::Error(reason) => {
                eprintln!("  {}: fetch failed: {}", station.id, reason);
                continue;
            }
        };

        let events = match iem::parse_vtec_response(&body) {
            Ok(events) => events,
            Err(e) => {
                eprintln!("  {}: parse error: {}", station.id, e);
                continue;
            }
        };
        if events.is_empty() {
            println!("  {}: no events", station.id);
            continue;
        }

        let rows: Vec<String> = events.iter().map(|e| e.csv_row(&station.id)).collect();
        match artifact::write_rows(&path, iem::VTEC_CSV_HEADER, &rows) {
            Ok(count) => {
                println!("  {}: {} events -> {}", station.id, count, path.display());
                written += 1;
            }
            Err(e) => eprintln!("  {}: write failed: {}", station.id, e),
        }
    }

    println!("\n✅ Done: VTEC artifacts written for {} stations", written);
}
