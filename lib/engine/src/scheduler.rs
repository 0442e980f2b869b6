//! Chunked parallel execution
//!
//! The left table is split into row-contiguous chunks that are matched
//! independently on a dedicated thread pool. Each chunk writes its result
//! into the slot of its index, so reassembly never depends on completion
//! order.

use fuzzyjoin_core::{Error, Result};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::ops::Range;
use tracing::debug;

/// Split `rows` into `chunks` contiguous ranges
///
/// The first `rows % chunks` ranges hold one extra row. When there are more
/// chunks than rows the trailing ranges are empty.
pub fn partition(rows: usize, chunks: usize) -> Vec<Range<usize>> {
    let chunks = chunks.max(1);
    let base = rows / chunks;
    let extra = rows % chunks;

    let mut start = 0;
    (0..chunks)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Fixed-size worker pool running one task per chunk
pub struct ChunkScheduler {
    pool: rayon::ThreadPool,
}

impl ChunkScheduler {
    /// Create a pool with `workers` threads; 0 uses every available core
    pub fn new(workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("fuzzyjoin-worker-{}", i))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task` over every chunk and return the results in chunk order
    ///
    /// Empty chunks are not dispatched and yield `T::default()`. If any task
    /// fails, the error of the lowest failing chunk is returned and no partial
    /// results are.
    pub fn run<T, F>(&self, chunks: &[Range<usize>], task: F) -> Result<Vec<T>>
    where
        T: Default + Send,
        F: Fn(usize, Range<usize>) -> Result<T> + Sync,
    {
        let slots: Vec<Mutex<Option<Result<T>>>> = chunks.iter().map(|_| Mutex::new(None)).collect();

        debug!(chunks = chunks.len(), workers = self.workers(), "dispatching chunks");
        self.pool.install(|| {
            chunks.par_iter().enumerate().for_each(|(index, range)| {
                let result = if range.is_empty() {
                    Ok(T::default())
                } else {
                    task(index, range.clone())
                };
                *slots[index].lock() = Some(result);
            });
        });

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.into_inner().ok_or_else(|| {
                    Error::WorkerPool(format!("chunk {} finished without a result", index))
                })?
            })
            .collect()
    }
}
