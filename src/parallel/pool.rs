//! Rayon thread pool sizing for parallel trials.

use rayon::ThreadPoolBuilder;

/// Environment variable read by [WorkerPool::from_env].
pub const WORKERS_ENV: &str = "BLU_WORKERS";

/// How many threads a parallel trial may use. `0` means Rayon's global pool (all cores).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Worker count from `BLU_WORKERS`; unset or unparsable means all cores.
    pub fn from_env() -> Self {
        match std::env::var(WORKERS_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(workers) => Self::with_workers(workers),
                Err(_) => {
                    tracing::warn!(value = %raw, "invalid BLU_WORKERS value, using all cores");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Run `f` with this many workers. A dedicated pool is built when a count is set; if that
    /// fails the global pool is used instead.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(
                    %err,
                    workers = self.workers,
                    "could not build worker pool, using global pool"
                );
                f()
            }
        }
    }
}
