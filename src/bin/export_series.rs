//! Export NOAA water level + predictions artifacts to JSON for the viewer.
//!
//! Reads `<station>_water_level.csv` / `<station>_predictions.csv` from the
//! data directory for every station in stations.toml and writes one
//! chart-ready JSON document. Parsed artifacts are cached by modification
//! time, so repeated exports reread only what changed.
//!
//! Usage:
//!   cargo run --bin export_series -- [--input-dir DIR] [--output FILE]

use std::env;
use std::path::PathBuf;
use std::process;

use tidefetch_service::cache::SeriesCache;
use tidefetch_service::config;
use tidefetch_service::export;

fn main() {
    dotenv::dotenv().ok();

    let mut input_dir = env::var("TIDEFETCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("noaa"));
    let mut output = PathBuf::from("data/water_level_data.json");

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input-dir" if i + 1 < args.len() => {
                input_dir = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--output" if i + 1 < args.len() => {
                output = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: {} [--input-dir DIR] [--output FILE]", args[0]);
                process::exit(1);
            }
        }
    }

    let stations = config::load_config();
    println!(
        "Exporting water level series | {} stations | input: {}",
        stations.len(),
        input_dir.display()
    );

    let mut cache = SeriesCache::new();
    let export = export::build_export(&stations, &input_dir, &mut cache);

    if export.series.is_empty() {
        eprintln!("No water level artifacts found in {}", input_dir.display());
        process::exit(1);
    }

    if let Err(e) = export::write_export(&output, &export) {
        eprintln!("❌ Failed to write {}: {}", output.display(), e);
        process::exit(1);
    }

    println!(
        "✅ Exported {} stations -> {}",
        export.series.len(),
        output.display()
    );
}
