//! Tidefetch Service - Batch Downloader
//!
//! Downloads the configured NOAA CO-OPS products for every station in
//! stations.toml, one CSV artifact per (station, product):
//! 1. Skips artifacts that already exist (use --force to re-download)
//! 2. Splits each date range into provider-sized chunks
//! 3. Fetches chunks in parallel under one global worker ceiling
//! 4. Merges, orders, and writes each series in a single pass
//! 5. Falls back to the alternate request shape where the preferred one
//!    is rejected (subordinate stations: predictions interval=6 → hilo)
//!
//! Usage:
//!   cargo run --release                          # full catalog, all stations
//!   cargo run --release -- --stations 8454000 --products water_level,predictions
//!
//! Environment:
//!   TIDEFETCH_DATA_DIR - output directory override (also read from .env)

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use std::process;

use tidefetch_service::config;
use tidefetch_service::engine::{EngineConfig, FetchEngine};
use tidefetch_service::products::{Product, PRODUCT_CATALOG};

fn parse_cli_date(value: &str, flag: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y%m%d").unwrap_or_else(|_| {
        eprintln!("Error: {} expects a yyyyMMdd date, got '{}'", flag, value);
        process::exit(1);
    })
}

fn main() {
    println!("🌊 Tidefetch Service");
    println!("=====================\n");

    // Load .env for TIDEFETCH_DATA_DIR
    dotenv::dotenv().ok();

    let mut config = EngineConfig::default();
    if let Ok(dir) = env::var("TIDEFETCH_DATA_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    let mut station_filter: Option<Vec<String>> = None;
    let mut product_filter: Option<Vec<String>> = None;

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--force" => {
                config.skip_existing = false;
                i += 1;
            }
            "--output-dir" | "--begin" | "--end" | "--datum" | "--workers" | "--stations"
            | "--products" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires a value", flag);
                    process::exit(1);
                }
                let value = args[i + 1].clone();
                match flag {
                    "--output-dir" => config.output_dir = PathBuf::from(value),
                    "--begin" => config.begin = parse_cli_date(&value, flag),
                    "--end" => config.end = parse_cli_date(&value, flag),
                    "--datum" => config.datum = value,
                    "--workers" => {
                        config.workers = value.parse().unwrap_or_else(|_| {
                            eprintln!("Error: --workers expects a number, got '{}'", value);
                            process::exit(1);
                        })
                    }
                    "--stations" => {
                        station_filter =
                            Some(value.split(',').map(|s| s.trim().to_string()).collect())
                    }
                    "--products" => {
                        product_filter =
                            Some(value.split(',').map(|s| s.trim().to_string()).collect())
                    }
                    _ => unreachable!(),
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {}", flag);
                eprintln!(
                    "Usage: {} [--output-dir DIR] [--begin yyyyMMdd] [--end yyyyMMdd] \
                     [--datum MLLW] [--workers N] [--stations id,id] [--products name,name] [--force]",
                    args[0]
                );
                process::exit(1);
            }
        }
    }

    // Resolve the station list from the registry
    let registry = config::load_config();
    let stations: Vec<_> = match &station_filter {
        Some(ids) => {
            for id in ids {
                if !registry.iter().any(|s| &s.id == id) {
                    eprintln!("⚠️  Station {} not in stations.toml, skipping", id);
                }
            }
            registry
                .into_iter()
                .filter(|s| ids.contains(&s.id))
                .collect()
        }
        None => registry,
    };
    if stations.is_empty() {
        eprintln!("Error: no stations to download");
        process::exit(1);
    }

    // Resolve the product list from the catalog
    let products: Vec<Product> = match &product_filter {
        Some(names) => names
            .iter()
            .map(|name| {
                Product::from_name(name).unwrap_or_else(|| {
                    eprintln!("Error: unknown product '{}'", name);
                    eprintln!(
                        "Known products: {}",
                        PRODUCT_CATALOG
                            .iter()
                            .map(|p| p.name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                    process::exit(1);
                })
            })
            .collect(),
        None => PRODUCT_CATALOG.to_vec(),
    };

    println!(
        "Stations: {} | Products: {} | {} to {} | datum {} | workers {} | skip_existing={}",
        stations.len(),
        products.len(),
        config.begin.format("%Y%m%d"),
        config.end.format("%Y%m%d"),
        config.datum,
        config.workers,
        config.skip_existing
    );
    let output_dir = config.output_dir.clone();
    println!("Output: {}\n", output_dir.display());

    let engine = match FetchEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            process::exit(1);
        }
    };

    let summary = engine.run_batch(&stations, &products);

    println!(
        "\n✅ Done: {} written, {} skipped, {} no data, {} failed",
        summary.written, summary.skipped, summary.no_data, summary.failed
    );
    println!("   Output in {}", output_dir.display());
}
