//! One scoped OS thread per job

use super::backend::{Backend, Job, JobResult};
use std::any::Any;
use std::thread;

/// Spawns a dedicated, named OS thread for every job and joins them all.
///
/// Threads are scoped, so jobs may borrow the caller's matrices. Creation
/// cost is paid on every fan-out; prefer [`Pool`](super::Pool) for small
/// operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Threads;

impl Backend for Threads {
    fn name(&self) -> &'static str {
        "threads"
    }

    fn join_all<'scope, T: Send + 'scope>(&self, jobs: Vec<Job<'scope, T>>) -> Vec<JobResult<T>> {
        thread::scope(|s| {
            let handles: Vec<_> = jobs
                .into_iter()
                .enumerate()
                .map(|(i, job)| {
                    thread::Builder::new()
                        .name(format!("parmat-worker-{i}"))
                        .spawn_scoped(s, job)
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle {
                    Ok(handle) => handle.join(),
                    Err(e) => Err(Box::new(format!("failed to spawn worker thread: {e}"))
                        as Box<dyn Any + Send>),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_jobs_run_on_named_threads() {
        let jobs: Vec<Job<'_, String>> = (0..3)
            .map(|_| {
                Box::new(|| thread::current().name().unwrap_or_default().to_string())
                    as Job<'_, _>
            })
            .collect();
        let names: Vec<String> = Threads
            .join_all(jobs)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(names, vec!["parmat-worker-0", "parmat-worker-1", "parmat-worker-2"]);
    }

    #[test]
    fn test_borrows_and_joins_everything() {
        let counter = AtomicUsize::new(0);
        let counter = &counter;
        let jobs: Vec<Job<'_, ()>> = (0..8)
            .map(|_| {
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }) as Job<'_, _>
            })
            .collect();
        let outcomes = Threads.join_all(jobs);
        assert_eq!(outcomes.len(), 8);
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }
}
