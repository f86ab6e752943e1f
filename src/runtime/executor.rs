//! Fixed-worker fan-out/fan-in executor

use super::backend::{Backend, Job, JobResult, Sequential, panic_message};
use super::config::ParallelismConfig;
use super::range::{Partition, WorkRange, partition};
use crate::error::{Error, Result};
use tracing::{trace, warn};

/// Splits an index space into `workers` contiguous WorkRanges, runs one unit
/// per non-empty range on backend `B`, and returns only after every unit has
/// finished.
///
/// # Failure policy
///
/// Units are never interrupted by a sibling's failure. Once all of them have
/// joined, the error of the lowest-indexed failing range is returned: errors
/// produced by the unit itself pass through unchanged, panics become
/// [`Error::WorkerFailure`] carrying that range.
#[derive(Clone, Debug)]
pub struct Executor<B: Backend = Sequential> {
    backend: B,
    workers: usize,
}

impl<B: Backend> Executor<B> {
    /// Create an executor running `workers` units per call on `backend`.
    pub fn new(backend: B, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::invalid_argument("workers", "must be positive"));
        }
        Ok(Self { backend, workers })
    }

    /// Create an executor from a validated configuration.
    pub fn from_config(backend: B, config: &ParallelismConfig) -> Result<Self> {
        config.validate()?;
        Self::new(backend, config.workers())
    }

    /// Units per call
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The scheduling backend
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The ranges a call over `[start, end)` would dispatch
    pub fn partition(&self, start: usize, end: usize) -> Partition {
        partition(start, end, self.workers)
    }

    /// Run `f` once per WorkRange of `[start, end)`, returning the per-range
    /// results in range order.
    ///
    /// Each unit owns its slot in the returned vector, so no shared state is
    /// needed to collect partial results.
    pub fn map_ranges<T, F>(&self, start: usize, end: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(WorkRange) -> Result<T> + Sync,
    {
        let ranges = self.partition(start, end);
        self.trace_dispatch(&ranges);

        let f = &f;
        let jobs: Vec<Job<'_, Result<T>>> = ranges
            .iter()
            .map(|&range| Box::new(move || f(range)) as Job<'_, _>)
            .collect();

        let outcomes = self.backend.join_all(jobs);
        self.gather(&ranges, outcomes)
    }

    /// Run `f(i)` for every `i` in `[start, end)`.
    pub fn for_each<F>(&self, start: usize, end: usize, f: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Sync,
    {
        self.map_ranges(start, end, |range| range.indices().try_for_each(&f))
            .map(drop)
    }

    /// Treat `out` as consecutive chunks of `chunk_len` elements and run
    /// `f(i, chunk_i)` for every chunk.
    ///
    /// Chunks are split off `out` before dispatch; each unit receives
    /// exclusive access to the chunks of its own range and nothing else.
    pub fn for_each_chunk_mut<T, F>(&self, out: &mut [T], chunk_len: usize, f: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> Result<()> + Sync,
    {
        if chunk_len == 0 || out.len() % chunk_len != 0 {
            return Err(Error::invalid_argument(
                "chunk_len",
                format!("{chunk_len} does not divide buffer of {}", out.len()),
            ));
        }

        let ranges = self.partition(0, out.len() / chunk_len);
        self.trace_dispatch(&ranges);
        let Some(first) = ranges.first() else {
            return Ok(());
        };

        // Every range but the last holds `first.len()` chunks, so fixed-size
        // units line up with the partition.
        let ranges_ref = &ranges;
        let unit = move |u: usize, head: &mut [T]| -> Result<()> {
            let start = ranges_ref[u].start;
            for (offset, chunk) in head.chunks_mut(chunk_len).enumerate() {
                f(start + offset, chunk)?;
            }
            Ok(())
        };

        let outcomes = self.backend.join_chunks(out, first.len() * chunk_len, &unit);
        self.gather(&ranges, outcomes).map(drop)
    }

    fn trace_dispatch(&self, ranges: &[WorkRange]) {
        trace!(
            backend = self.backend.name(),
            workers = self.workers,
            dispatched = ranges.len(),
            extent = ?ranges.first().zip(ranges.last()).map(|(a, b)| (a.start, b.end)),
            "fan-out"
        );
    }

    fn gather<T>(&self, ranges: &[WorkRange], outcomes: Vec<JobResult<Result<T>>>) -> Result<Vec<T>> {
        let mut values = Vec::with_capacity(outcomes.len());
        let mut first_error = None;
        let mut failed = 0usize;

        for (range, outcome) in ranges.iter().zip(outcomes) {
            let error = match outcome {
                Ok(Ok(value)) => {
                    values.push(value);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(payload) => Error::WorkerFailure {
                    start: range.start,
                    end: range.end,
                    reason: panic_message(&*payload),
                },
            };
            failed += 1;
            first_error.get_or_insert(error);
        }

        match first_error {
            Some(error) => {
                warn!(
                    backend = self.backend.name(),
                    failed,
                    dispatched = ranges.len(),
                    %error,
                    "worker units failed"
                );
                Err(error)
            }
            None => Ok(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rejects_zero_workers() {
        assert!(matches!(
            Executor::new(Sequential, 0),
            Err(Error::InvalidArgument { arg: "workers", .. })
        ));
    }

    #[test]
    fn test_map_ranges_in_order() {
        let exec = Executor::new(Sequential, 3).unwrap();
        let sums = exec
            .map_ranges(0, 10, |r| Ok(r.indices().sum::<usize>()))
            .unwrap();
        // [0, 4), [4, 8), [8, 10)
        assert_eq!(sums, vec![6, 22, 17]);
    }

    #[test]
    fn test_for_each_visits_every_index_once() {
        let exec = Executor::new(Sequential, 4).unwrap();
        let hits: Vec<AtomicUsize> = (0..13).map(|_| AtomicUsize::new(0)).collect();
        exec.for_each(0, 13, |i| {
            hits[i].fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .unwrap();
        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_chunks_get_their_index() {
        let exec = Executor::new(Sequential, 2).unwrap();
        let mut buf = vec![0usize; 12];
        exec.for_each_chunk_mut(&mut buf, 3, |i, chunk| {
            chunk.fill(i);
            Ok(())
        })
        .unwrap();
        assert_eq!(buf, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn test_chunk_len_must_divide() {
        let exec = Executor::new(Sequential, 2).unwrap();
        let mut buf = vec![0.0; 5];
        assert!(exec.for_each_chunk_mut(&mut buf, 2, |_, _| Ok(())).is_err());
        assert!(exec.for_each_chunk_mut(&mut buf, 0, |_, _| Ok(())).is_err());
    }

    #[test]
    fn test_first_failing_range_wins_after_all_ran() {
        let exec = Executor::new(Sequential, 4).unwrap();
        let ran = AtomicUsize::new(0);
        let err = exec
            .map_ranges(0, 8, |r| {
                ran.fetch_add(1, Ordering::SeqCst);
                if r.start >= 2 {
                    Err(Error::invalid_argument("range", r.to_string()))
                } else {
                    Ok(())
                }
            })
            .unwrap_err();
        assert_eq!(ran.load(Ordering::SeqCst), 4);
        match err {
            Error::InvalidArgument { reason, .. } => assert_eq!(reason, "[2, 4)"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_panic_becomes_worker_failure() {
        let exec = Executor::new(Sequential, 2).unwrap();
        let err = exec
            .for_each(0, 4, |i| {
                if i == 3 {
                    panic!("bad row {i}");
                }
                Ok(())
            })
            .unwrap_err();
        match err {
            Error::WorkerFailure { start, end, reason } => {
                assert_eq!((start, end), (2, 4));
                assert_eq!(reason, "bad row 3");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
