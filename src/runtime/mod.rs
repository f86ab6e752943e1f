//! Parallel execution runtime
//!
//! An [`Executor`] partitions an index space into contiguous [`WorkRange`]s and
//! hands one unit of work per range to a [`Backend`], blocking until all units
//! have joined.
//!
//! # Architecture
//!
//! ```text
//! Executor<B>  (partitioning, error policy, worker count)
//! └── Backend  (how units are scheduled)
//!     ├── Sequential  inline on the caller, reference behaviour
//!     ├── Threads     one scoped OS thread per unit
//!     ├── Pool        rayon tasks on a global or dedicated pool  (feature `rayon`)
//!     └── ParallelFor rayon parallel loops, one chunk per range    (feature `rayon`)
//! ```
//!
//! Every backend satisfies the same contract, so the matrix operations and the
//! formula evaluator are written once against `Executor<B>`.

mod backend;
mod config;
mod executor;
#[cfg(feature = "rayon")]
mod parallel_for;
#[cfg(feature = "rayon")]
mod pool;
mod range;
mod threads;

pub use backend::{Backend, Job, JobResult, Sequential};
pub use config::{DEFAULT_WORKERS, ParallelismConfig};
pub use executor::Executor;
#[cfg(feature = "rayon")]
pub use parallel_for::ParallelFor;
#[cfg(feature = "rayon")]
pub use pool::Pool;
pub use range::{Partition, WorkRange, partition};
pub use threads::Threads;
