//! tidefetch_service: chunked downloader for coastal time series.
//!
//! Fetches tidal, water level, and meteorological series from the NOAA
//! CO-OPS API (plus NWS VTEC event histories from IEM) for a registry of
//! stations, reassembles the chunked responses into one CSV artifact per
//! (station, product), and exports chart-ready JSON for the map viewer.
//!
//! # Module structure
//!
//! ```text
//! tidefetch_service
//! ├── model       — shared data types (Chunk, FetchStatus, ResponseClass, …)
//! ├── config      — station registry configuration loader (stations.toml)
//! ├── products    — CO-OPS product catalog: datum rules, chunk windows, fallbacks
//! ├── chunker     — splits a date span into provider-sized chunks
//! ├── fetch       — ChunkFetcher seam + blocking HTTP implementation
//! ├── pool        — global bounded worker pool; fan-out/collect per chunk plan
//! ├── merge       — classify chunk bodies, reassemble + order the series
//! ├── artifact    — skip-existing/force gate and one-pass CSV writer
//! ├── engine      — per-(station, product) pipeline with shape fallback; batch runner
//! ├── ingest
//! │   ├── coops   — NOAA CO-OPS API: URL construction + response classification
//! │   ├── iem     — IEM VTEC events-by-point API client
//! │   └── fixtures (test only) — representative API response payloads
//! ├── cache       — mtime-keyed cache of parsed artifacts
//! └── export      — artifact → JSON series for the front end
//! ```

pub mod artifact;
pub mod cache;
pub mod chunker;
pub mod config;
pub mod engine;
pub mod export;
pub mod fetch;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod pool;
pub mod products;
