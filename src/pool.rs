/// Parallel fetch orchestrator.
///
/// One bounded worker pool is created per batch run and shared by every
/// (station, product) chunk plan, so the worker count is a true global
/// ceiling on in-flight provider requests no matter how many stations the
/// batch iterates. Completion order is unspecified; `fetch_all` re-walks
/// the plan in chronological chunk order before returning, so concurrency
/// affects latency only, never output ordering.

use crate::fetch::ChunkFetcher;
use crate::model::{Chunk, ChunkResult, FetchStatus};
use crate::products::{Product, RequestShape};
use std::sync::mpsc;
use std::sync::Arc;
use threadpool::ThreadPool;

pub struct FetchPool {
    pool: ThreadPool,
}

impl FetchPool {
    pub fn new(workers: usize) -> Self {
        Self {
            pool: ThreadPool::new(workers.max(1)),
        }
    }

    pub fn workers(&self) -> usize {
        self.pool.max_count()
    }

    /// Dispatches every chunk of one plan onto the shared pool and collects
    /// one result per chunk, in the plan's original order.
    ///
    /// Chunks are independent: a failed fetch never blocks or invalidates
    /// the others. A worker that dies without reporting yields an error
    /// result for its chunk rather than hanging the collection.
    pub fn fetch_all(
        &self,
        fetcher: &Arc<dyn ChunkFetcher>,
        station: &str,
        product: Product,
        shape: &RequestShape,
        chunks: &[Chunk],
    ) -> Vec<ChunkResult> {
        let (tx, rx) = mpsc::channel();

        for (idx, chunk) in chunks.iter().enumerate() {
            let tx = tx.clone();
            let fetcher = Arc::clone(fetcher);
            let station = station.to_string();
            let shape = shape.clone();
            let chunk = *chunk;
            self.pool.execute(move || {
                let status = fetcher.fetch(&station, product, &shape, &chunk);
                // Send fails only if the collector is gone; the result is
                // unwanted then.
                let _ = tx.send((idx, ChunkResult { chunk, status }));
            });
        }
        drop(tx);

        let mut collected: Vec<Option<ChunkResult>> = chunks.iter().map(|_| None).collect();
        for (idx, result) in rx {
            collected[idx] = Some(result);
        }

        collected
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.unwrap_or_else(|| ChunkResult {
                    chunk: chunks[idx],
                    status: FetchStatus::Error("fetch worker terminated without reporting".to_string()),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
