/// Core download engine.
///
/// Drives one (station, product) unit of work end to end:
/// 1. Consults the output gate — an existing artifact short-circuits the
///    unit with zero fetches
/// 2. Plans chunks for the product's preferred request shape
/// 3. Fans the plan out over the shared worker pool
/// 4. Merges and classifies the chunk results
/// 5. Falls back to the product's alternate shape when the primary shape
///    was rejected outright
/// 6. Writes the artifact in one pass, or reports no-data
///
/// Nothing here is fatal at batch level: a failed station/product logs one
/// line and the batch moves on.

use crate::artifact::{self, OutputGate};
use crate::chunker::chunk_plan;
use crate::config::StationConfig;
use crate::fetch::{ChunkFetcher, HttpFetcher};
use crate::ingest::coops;
use crate::merge::{merge_chunks, MergeReport};
use crate::model::ShapeUsed;
use crate::pool::FetchPool;
use crate::products::{Product, RequestShape};
use chrono::{NaiveDate, Utc};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine configuration for one batch run.
pub struct EngineConfig {
    /// Directory receiving the per-(station, product) CSV artifacts.
    pub output_dir: PathBuf,

    /// Inclusive date range to download.
    pub begin: NaiveDate,
    pub end: NaiveDate,

    /// Vertical datum for water-level-family products (default: MLLW).
    pub datum: String,

    /// Global worker ceiling shared by every chunk plan in the batch.
    pub workers: usize,

    /// False re-downloads and overwrites existing artifacts (--force).
    pub skip_existing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("noaa"),
            begin: NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid default begin date"),
            end: Utc::now().date_naive(),
            datum: "MLLW".to_string(),
            workers: 8,
            skip_existing: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Terminal state of one (station, product) unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    /// Artifact already present; zero fetches performed.
    SkippedExisting,
    /// Both attempts (where a fallback exists) produced nothing; no
    /// artifact written.
    NoData,
    /// Artifact written, with the shape that produced it.
    Written {
        path: PathBuf,
        rows: usize,
        shape: ShapeUsed,
    },
}

/// Batch-level tally, printed at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub no_data: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct FetchEngine {
    config: EngineConfig,
    fetcher: Arc<dyn ChunkFetcher>,
    pool: FetchPool,
}

impl FetchEngine {
    /// Engine with the real HTTP fetcher.
    pub fn new(config: EngineConfig) -> Result<Self, Box<dyn Error>> {
        let fetcher: Arc<dyn ChunkFetcher> = Arc::new(HttpFetcher::new()?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Engine with a caller-supplied fetcher (tests use scripted ones).
    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn ChunkFetcher>) -> Self {
        let pool = FetchPool::new(config.workers);
        Self {
            config,
            fetcher,
            pool,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One full chunk plan under one request shape: plan, fan out, merge.
    fn run_attempt(&self, station: &str, product: Product, shape: &RequestShape) -> MergeReport {
        let chunks = chunk_plan(self.config.begin, self.config.end, shape.window);
        let results = self
            .pool
            .fetch_all(&self.fetcher, station, product, shape, &chunks);
        merge_chunks(&results, coops::classify_response)
    }

    /// Runs one (station, product) unit of work through the gate, the
    /// primary attempt, and — when the primary shape was rejected — the
    /// fallback attempt.
    pub fn run_station_product(
        &self,
        station: &str,
        product: Product,
    ) -> Result<SeriesOutcome, Box<dyn Error>> {
        let path = artifact::artifact_path(&self.config.output_dir, station, product);
        let gate = OutputGate {
            skip_existing: self.config.skip_existing,
        };
        if gate.should_skip(&path) {
            return Ok(SeriesOutcome::SkippedExisting);
        }

        let primary = product.preferred_shape(&self.config.datum);
        let report = self.run_attempt(station, product, &primary);
        if let Some(series) = &report.series {
            let rows = artifact::write_series(&path, series)?;
            return Ok(SeriesOutcome::Written {
                path,
                rows,
                shape: ShapeUsed::Primary,
            });
        }

        if report.shape_rejected {
            if let Some(fallback) = product.fallback_shape(&self.config.datum) {
                let report = self.run_attempt(station, product, &fallback);
                if let Some(series) = &report.series {
                    let rows = artifact::write_series(&path, series)?;
                    return Ok(SeriesOutcome::Written {
                        path,
                        rows,
                        shape: ShapeUsed::Fallback,
                    });
                }
            }
        }

        Ok(SeriesOutcome::NoData)
    }

    /// Iterates stations × products, isolating failures to their unit of
    /// work, and returns the batch tally.
    pub fn run_batch(&self, stations: &[StationConfig], products: &[Product]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for station in stations {
            println!("Station {} ({})", station.id, station.name);
            for product in products {
                match self.run_station_product(&station.id, *product) {
                    Ok(SeriesOutcome::SkippedExisting) => {
                        println!("  {}: skipped (exists)", product.name());
                        summary.skipped += 1;
                    }
                    Ok(SeriesOutcome::NoData) => {
                        println!("  {}: no data", product.name());
                        summary.no_data += 1;
                    }
                    Ok(SeriesOutcome::Written { path, rows, shape }) => {
                        let suffix = match shape {
                            ShapeUsed::Primary => "",
                            ShapeUsed::Fallback => " (fallback shape)",
                        };
                        println!(
                            "  {}: {} rows -> {}{}",
                            product.name(),
                            rows,
                            path.display(),
                            suffix
                        );
                        summary.written += 1;
                    }
                    Err(e) => {
                        eprintln!("  {}: failed: {}", product.name(), e);
                        summary.failed += 1;
                    }
                }
            }
        }

        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
