//! Two-way fork/join used between formula branches

use std::panic;
use std::thread;

/// Runs two closures, potentially in parallel, and returns both results.
///
/// `a` and `b` share no state; the call returns once both have finished.
pub(crate) trait Fork: Sync {
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;

    /// Like [`join`](Fork::join), but calls `launched` on the calling thread
    /// once both sides have been handed off and before either is awaited.
    fn join_launched<A, B, L, RA, RB>(&self, a: A, b: B, launched: L) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        L: FnOnce() + Send,
        RA: Send,
        RB: Send,
    {
        launched();
        self.join(a, b)
    }
}

/// `a` then `b` on the calling thread
#[derive(Clone, Copy, Debug)]
pub(crate) struct Inline;

impl Fork for Inline {
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        let ra = a();
        (ra, b())
    }
}

/// `a` on a scoped thread, `b` on the calling thread
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScopedThreads;

impl Fork for ScopedThreads {
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        self.join_launched(a, b, || {})
    }

    fn join_launched<A, B, L, RA, RB>(&self, a: A, b: B, launched: L) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        L: FnOnce() + Send,
        RA: Send,
        RB: Send,
    {
        thread::scope(|s| {
            let handle = s.spawn(a);
            launched();
            let rb = b();
            match handle.join() {
                Ok(ra) => (ra, rb),
                Err(payload) => panic::resume_unwind(payload),
            }
        })
    }
}

/// `rayon::join`, so both sides can be stolen by pool threads
#[cfg(feature = "rayon")]
#[derive(Clone, Copy, Debug)]
pub(crate) struct RayonJoin;

#[cfg(feature = "rayon")]
impl Fork for RayonJoin {
    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        rayon::join(a, b)
    }

    fn join_launched<A, B, L, RA, RB>(&self, a: A, b: B, launched: L) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        L: FnOnce() + Send,
        RA: Send,
        RB: Send,
    {
        // rayon pushes `b` onto the local deque before running `a`
        rayon::join(
            move || {
                launched();
                a()
            },
            b,
        )
    }
}
