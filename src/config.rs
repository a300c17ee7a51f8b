/// Station registry loader - parses stations.toml
///
/// Separates station metadata from code, making it easy to add stations
/// or correct coordinates without recompiling the downloader.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// Station metadata loaded from stations.toml configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    /// 7-digit NOAA CO-OPS station ID.
    pub id: String,
    /// Official station name.
    pub name: String,

    // Geographic location (used for VTEC point queries)
    pub latitude: f64,
    pub longitude: f64,
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Deserialize)]
struct StationRegistry {
    station: Vec<StationConfig>,
}

/// Loads the station registry from stations.toml.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data. This is intentional — the downloader cannot operate
/// without valid station metadata.
///
/// # File Location
/// Expects `stations.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> Vec<StationConfig> {
    let config_path = "stations.toml";

    let contents = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    let registry: StationRegistry = toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e));

    registry.station
}

/// Loads the station registry and builds a lookup map keyed by station ID.
pub fn load_config_map() -> HashMap<String, StationConfig> {
    load_config()
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect()
}
