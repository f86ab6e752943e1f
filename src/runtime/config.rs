//! Parallelism configuration

use crate::error::{Error, Result};

/// Default number of workers per operation
pub const DEFAULT_WORKERS: usize = 5;

/// Degree of parallelism for executors and formula evaluation.
///
/// `workers` is the number of WorkRanges each parallel operation splits its
/// index space into. It is never scaled automatically. `pool_threads`
/// optionally sizes a dedicated rayon pool; `None` shares rayon's global pool.
///
/// ```
/// # use parmat::runtime::ParallelismConfig;
/// let config = ParallelismConfig::new(4).with_pool_threads(Some(2));
/// assert!(config.validate().is_ok());
/// assert!(ParallelismConfig::new(0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelismConfig {
    workers: usize,
    pool_threads: Option<usize>,
}

impl ParallelismConfig {
    /// Configuration with `workers` units per operation
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            pool_threads: None,
        }
    }

    /// Size a dedicated thread pool instead of sharing the global one
    pub fn with_pool_threads(mut self, threads: Option<usize>) -> Self {
        self.pool_threads = threads;
        self
    }

    /// Workers per operation
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Dedicated pool size, if any
    #[inline]
    pub fn pool_threads(&self) -> Option<usize> {
        self.pool_threads
    }

    /// Reject zero workers or a zero-sized pool.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::invalid_argument("workers", "must be positive"));
        }
        if self.pool_threads == Some(0) {
            return Err(Error::invalid_argument("pool_threads", "must be positive"));
        }
        Ok(())
    }
}

impl Default for ParallelismConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
