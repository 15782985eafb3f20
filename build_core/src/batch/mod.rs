//! Batch execution of independent simulation runs
//!
//! Runs are executed in chunks. Between chunks the progress callback is
//! invoked and the cancel token is checked, so a long batch can be observed
//! and abandoned. Every run draws from its own `ChaCha8Rng` derived from the
//! batch seed and the run index, which makes a batch reproducible and gives
//! identical results whether it runs sequentially or sharded with rayon.

mod stats;

pub use stats::Distribution;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Batch execution error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("Batch cancelled after {completed} of {total} runs")]
    Cancelled { completed: usize, total: usize },
}

/// Cooperative cancellation flag shared between a batch and its owner
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How many runs to execute and how
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    pub runs: usize,
    /// Runs per scheduling slice
    pub chunk_size: usize,
    /// Fixed seed for reproducible batches; random when absent
    pub seed: Option<u64>,
    /// Shard each chunk across the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            runs: 1000,
            chunk_size: 50,
            seed: None,
            parallel: false,
        }
    }
}

impl BatchOptions {
    pub fn seeded(runs: usize, seed: u64) -> Self {
        BatchOptions {
            runs,
            seed: Some(seed),
            ..Default::default()
        }
    }
}

/// RNG for one run of a batch
pub fn run_rng(seed: u64, run_index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(run_index as u64);
    rng
}

/// Executes a batch of independent runs
#[derive(Debug, Clone)]
pub struct BatchRunner {
    options: BatchOptions,
    seed: u64,
    cancel: CancelToken,
}

impl BatchRunner {
    pub fn new(options: BatchOptions) -> Self {
        let seed = options.seed.unwrap_or_else(rand::random);
        debug!(seed, runs = options.runs, "batch seed resolved");
        BatchRunner {
            options,
            seed,
            cancel: CancelToken::new(),
        }
    }

    /// Share a cancel token with the caller
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn runs(&self) -> usize {
        self.options.runs
    }

    /// Execute every run, returning results in run order.
    ///
    /// `run_one` receives the run index and that run's RNG. `progress` is
    /// called with `(completed, total)` after each chunk.
    pub fn run<T, F, P>(&self, run_one: F, mut progress: P) -> Result<Vec<T>, BatchError>
    where
        T: Send,
        F: Fn(usize, &mut ChaCha8Rng) -> T + Sync,
        P: FnMut(usize, usize),
    {
        let total = self.options.runs;
        let chunk_size = self.options.chunk_size.max(1);
        let mut results = Vec::with_capacity(total);

        let mut start = 0;
        while start < total {
            if self.cancel.is_cancelled() {
                info!(completed = start, total, "batch cancelled");
                return Err(BatchError::Cancelled {
                    completed: start,
                    total,
                });
            }

            let end = (start + chunk_size).min(total);
            let execute = |index: usize| {
                let mut rng = run_rng(self.seed, index);
                run_one(index, &mut rng)
            };

            if self.options.parallel {
                let chunk: Vec<T> = (start..end).into_par_iter().map(execute).collect();
                results.extend(chunk);
            } else {
                results.extend((start..end).map(execute));
            }

            start = end;
            progress(start, total);
        }

        info!(runs = total, seed = self.seed, "batch complete");
        Ok(results)
    }
}
