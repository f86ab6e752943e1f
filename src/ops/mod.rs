//! Parallel matrix operations
//!
//! [`MatrixOps`] is implemented for every [`Executor`](crate::runtime::Executor),
//! so the same call works on any backend:
//!
//! ```text
//! Executor<B>
//!   └── implements MatrixOps
//!         ├── sum, subtract, scale   (one output row per index)
//!         ├── multiply               (one output row per index, rhs shared read-only)
//!         ├── min                    (per-worker partial minima)
//!         └── multiply_vector        (one output column per index, Kahan summation)
//! ```
//!
//! Every operation validates shapes and allocates its output before any work is
//! dispatched, then calls the row-level kernels from [`crate::kernels`]. The
//! result is bit-identical to the sequential kernels for any worker count;
//! [`Reference`] calls those kernels directly.

mod matrix;
mod parallel;
mod reference;

pub use matrix::MatrixOps;
pub use reference::Reference;
