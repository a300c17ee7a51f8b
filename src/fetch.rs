/// Remote fetch unit: one HTTP GET per chunk.
///
/// The `ChunkFetcher` trait is the seam between the pipeline and the
/// network — the engine and tests drive scripted fetchers through the same
/// interface the real HTTP client implements. The HTTP implementation
/// never lets a transport problem escape as an error: timeouts, refused
/// connections, and non-2xx statuses all come back as
/// `FetchStatus::Error`, which downstream treats as an empty chunk.

use crate::ingest::coops;
use crate::model::{Chunk, FetchStatus};
use crate::products::{Product, RequestShape};
use std::thread;
use std::time::Duration;

/// Bound on any single provider call.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Identifies this client to the provider, per CO-OPS usage guidelines.
pub const USER_AGENT: &str = "tidefetch_service/1.0";

/// Pause after every call to stay under the provider's informal rate limits.
const REQUEST_DELAY_MS: u64 = 50;

// ---------------------------------------------------------------------------
// Fetcher seam
// ---------------------------------------------------------------------------

/// Performs exactly one fetch attempt for one chunk of one request.
/// Implementations must be shareable across the worker pool.
pub trait ChunkFetcher: Send + Sync {
    fn fetch(
        &self,
        station: &str,
        product: Product,
        shape: &RequestShape,
        chunk: &Chunk,
    ) -> FetchStatus;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Blocking reqwest client with the pipeline's timeout and identification
/// baked in. One instance is shared by every worker in a batch run.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client()?,
        })
    }
}

impl ChunkFetcher for HttpFetcher {
    fn fetch(
        &self,
        station: &str,
        product: Product,
        shape: &RequestShape,
        chunk: &Chunk,
    ) -> FetchStatus {
        let url = coops::build_url(station, product, shape, chunk);
        let status = fetch_text(&self.client, &url);
        thread::sleep(Duration::from_millis(REQUEST_DELAY_MS));
        status
    }
}

/// Builds the shared blocking client (also used by the VTEC downloader).
pub fn build_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
}

/// One GET, mapped into `FetchStatus`. Body decoding problems count as
/// transport errors; sentinel detection happens later in classification.
pub fn fetch_text(client: &reqwest::blocking::Client, url: &str) -> FetchStatus {
    match client.get(url).send() {
        Ok(response) => {
            if !response.status().is_success() {
                return FetchStatus::Error(format!("HTTP {}", response.status()));
            }
            match response.text() {
                Ok(body) => FetchStatus::Ok(body),
                Err(e) => FetchStatus::Error(format!("body read failed: {}", e)),
            }
        }
        Err(e) => FetchStatus::Error(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
