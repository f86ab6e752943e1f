//! Scheduling backends
//!
//! A backend runs a batch of independent jobs and blocks until every one of
//! them has finished. It knows nothing about ranges or matrices; the
//! [`Executor`](super::Executor) builds one job per WorkRange.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// A unit of work borrowed for the duration of one fan-out
pub type Job<'scope, T> = Box<dyn FnOnce() -> T + Send + 'scope>;

/// Outcome of a job: its value, or the payload of its panic
pub type JobResult<T> = thread::Result<T>;

/// Fan-out/fan-in scheduler.
///
/// Implementations must run every job exactly once, must not return before all
/// jobs have completed, and must report outcomes in job order. A panicking job
/// must not prevent its siblings from running.
pub trait Backend: fmt::Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Run all jobs to completion and return their outcomes in order.
    fn join_all<'scope, T: Send + 'scope>(&self, jobs: Vec<Job<'scope, T>>) -> Vec<JobResult<T>>;

    /// Split `out` into consecutive units of `unit_len` elements (the last
    /// one may be shorter) and run `unit(u, chunk)` for each, returning the
    /// outcomes in unit order.
    ///
    /// The default builds one job per unit and hands them to
    /// [`join_all`](Backend::join_all). `unit_len` must be positive.
    fn join_chunks<'a, T, R, F>(&self, out: &'a mut [T], unit_len: usize, unit: &'a F) -> Vec<JobResult<R>>
    where
        T: Send,
        R: Send + 'a,
        F: Fn(usize, &mut [T]) -> R + Sync,
    {
        let jobs: Vec<Job<'a, R>> = out
            .chunks_mut(unit_len)
            .enumerate()
            .map(|(u, chunk)| Box::new(move || unit(u, chunk)) as Job<'a, R>)
            .collect();
        self.join_all(jobs)
    }

    /// Run `op` inside the backend's execution context.
    ///
    /// Pool backends run it on one of their threads so nested fork-join work
    /// lands on the same pool; other backends run it inline.
    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        op()
    }
}

/// Runs a job, capturing a panic instead of unwinding into the caller
#[inline]
pub(crate) fn run_caught<T>(job: Job<'_, T>) -> JobResult<T> {
    panic::catch_unwind(AssertUnwindSafe(job))
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Runs jobs one after another on the calling thread.
///
/// This is the single-threaded reference backend: same partitioning and error
/// handling as the parallel backends, no concurrency.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl Backend for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn join_all<'scope, T: Send + 'scope>(&self, jobs: Vec<Job<'scope, T>>) -> Vec<JobResult<T>> {
        jobs.into_iter().map(run_caught).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_runs_in_order() {
        let jobs: Vec<Job<'_, usize>> = (0usize..4)
            .map(|i| Box::new(move || i * 10) as Job<'_, _>)
            .collect();
        let out: Vec<usize> = Sequential
            .join_all(jobs)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(out, vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_panic_is_captured_and_siblings_run() {
        let failing: Job<'_, u8> = Box::new(|| -> u8 { panic!("boom") });
        let ok: Job<'_, u8> = Box::new(|| 7);
        let out = Sequential.join_all(vec![failing, ok]);
        let msg = panic_message(&**out[0].as_ref().unwrap_err());
        assert_eq!(msg, "boom");
        assert_eq!(*out[1].as_ref().unwrap(), 7);
    }

    #[test]
    fn test_join_chunks_splits_by_unit() {
        let mut buf = vec![0usize; 7];
        let lens = Sequential.join_chunks(&mut buf, 3, &|u: usize, chunk: &mut [usize]| {
            chunk.fill(u + 1);
            chunk.len()
        });
        let lens: Vec<usize> = lens.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(lens, vec![3, 3, 1]);
        assert_eq!(buf, vec![1, 1, 1, 2, 2, 2, 3]);
    }
}
