//! Data-parallel loop backend over rayon parallel iterators

use super::backend::{Backend, Job, JobResult, run_caught};
use super::config::ParallelismConfig;
use super::pool::Pool;
use crate::error::Result;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};

/// Runs every unit as one iteration of a rayon parallel loop.
///
/// Output buffers are split with `par_chunks_mut`, one chunk per WorkRange,
/// instead of being handed out as boxed tasks. Loops run inside the wrapped
/// [`Pool`], so a dedicated pool from the configuration is honoured.
#[derive(Clone, Debug, Default)]
pub struct ParallelFor {
    pool: Pool,
}

impl ParallelFor {
    /// Loop on rayon's global pool
    pub fn global() -> Self {
        Self { pool: Pool::global() }
    }

    /// Loop on the pool `config` selects
    pub fn from_config(config: &ParallelismConfig) -> Result<Self> {
        Ok(Self {
            pool: Pool::from_config(config)?,
        })
    }

    /// Number of threads iterations may run on
    pub fn threads(&self) -> usize {
        self.pool.threads()
    }
}

impl Backend for ParallelFor {
    fn name(&self) -> &'static str {
        "parallel-for"
    }

    fn join_all<'scope, T: Send + 'scope>(&self, jobs: Vec<Job<'scope, T>>) -> Vec<JobResult<T>> {
        self.pool.install(|| {
            jobs.into_par_iter()
                .with_min_len(1)
                .map(run_caught)
                .collect()
        })
    }

    fn join_chunks<'a, T, R, F>(&self, out: &'a mut [T], unit_len: usize, unit: &'a F) -> Vec<JobResult<R>>
    where
        T: Send,
        R: Send + 'a,
        F: Fn(usize, &mut [T]) -> R + Sync,
    {
        self.pool.install(|| {
            out.par_chunks_mut(unit_len)
                .with_min_len(1)
                .enumerate()
                .map(|(u, chunk)| panic::catch_unwind(AssertUnwindSafe(|| unit(u, chunk))))
                .collect()
        })
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Executor;

    #[test]
    fn test_chunks_follow_partition() {
        let exec = Executor::new(ParallelFor::global(), 3).unwrap();
        let mut buf = vec![0usize; 10];
        exec.for_each_chunk_mut(&mut buf, 1, |i, chunk| {
            chunk[0] = i;
            Ok(())
        })
        .unwrap();
        assert_eq!(buf, (0..10).collect::<Vec<_>>());

        // [0, 4), [4, 8), [8, 10)
        let starts = exec.map_ranges(0, 10, |r| Ok(r.start)).unwrap();
        assert_eq!(starts, vec![0, 4, 8]);
    }

    #[test]
    fn test_panicking_chunk_is_captured() {
        let backend = ParallelFor::from_config(&ParallelismConfig::new(2).with_pool_threads(Some(2))).unwrap();
        assert_eq!(backend.threads(), 2);
        let mut buf = vec![1u8; 6];
        let outcomes = backend.join_chunks(&mut buf, 2, &|u: usize, chunk: &mut [u8]| {
            if u == 1 {
                panic!("chunk {u}");
            }
            chunk.fill(0);
        });
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert!(outcomes[2].is_ok());
        assert_eq!(buf, vec![0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_outcomes_in_job_order() {
        let jobs: Vec<Job<'_, usize>> = (0usize..20)
            .map(|i| Box::new(move || i + 1) as Job<'_, _>)
            .collect();
        let out: Vec<usize> = ParallelFor::global()
            .join_all(jobs)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(out, (1..=20).collect::<Vec<_>>());
    }
}
