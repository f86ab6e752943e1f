//! rayon task pool backend

use super::backend::{Backend, Job, JobResult, run_caught};
use super::config::ParallelismConfig;
use crate::error::{Error, Result};
use std::any::Any;
use std::sync::Arc;

/// Spawns jobs as rayon tasks, either on the global pool or on a dedicated
/// pool sized by [`ParallelismConfig::pool_threads`].
///
/// Blocking in [`Backend::join_all`] happens inside a rayon scope, so a pool
/// thread that waits on nested work keeps stealing tasks instead of idling.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Pool {
    /// Use rayon's global pool
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Build a dedicated pool with `threads` threads
    pub fn with_threads(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::invalid_argument("pool_threads", "must be positive"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("parmat-pool-{i}"))
            .build()
            .map_err(|e| Error::Backend(format!("failed to build thread pool: {e}")))?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Dedicated pool if `config` asks for one, global pool otherwise
    pub fn from_config(config: &ParallelismConfig) -> Result<Self> {
        match config.pool_threads() {
            Some(threads) => Self::with_threads(threads),
            None => Ok(Self::global()),
        }
    }

    /// Number of threads jobs may run on
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

fn spawn_all<'scope, T: Send + 'scope>(
    s: &rayon::Scope<'scope>,
    slots: &'scope mut [Option<JobResult<T>>],
    jobs: Vec<Job<'scope, T>>,
) {
    for (slot, job) in slots.iter_mut().zip(jobs) {
        s.spawn(move |_| *slot = Some(run_caught(job)));
    }
}

impl Backend for Pool {
    fn name(&self) -> &'static str {
        "pool"
    }

    fn join_all<'scope, T: Send + 'scope>(&self, jobs: Vec<Job<'scope, T>>) -> Vec<JobResult<T>> {
        let mut slots: Vec<Option<JobResult<T>>> = Vec::with_capacity(jobs.len());
        slots.resize_with(jobs.len(), || None);

        match &self.pool {
            Some(pool) => pool.scope(|s| spawn_all(s, &mut slots, jobs)),
            None => rayon::scope(|s| spawn_all(s, &mut slots, jobs)),
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| Err(Box::new("job was never scheduled") as Box<dyn Any + Send>))
            })
            .collect()
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
