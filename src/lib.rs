//! # parmat
//!
//! **Parallel dense-matrix arithmetic and formula evaluation.**
//!
//! parmat runs a small set of matrix primitives (elementwise sum and
//! difference, naive multiply, scalar multiply, min reduction, compensated
//! vector-matrix product) across a fixed number of workers, and composes them
//! into two fixed formulas whose independent sub-expressions run concurrently.
//!
//! ## Layers
//!
//! - [`kernels`]: pure sequential kernels, the reference for every result
//! - [`runtime`]: the [`Executor`](runtime::Executor) work partitioner and its
//!   scheduling backends
//! - [`ops`]: [`MatrixOps`](ops::MatrixOps) over any executor
//! - [`formula`]: dependency-aware evaluation of the two formulas
//! - [`matrix`]: the dense matrix type, sample data, console previews
//!
//! ## Quick Start
//!
//! ```rust
//! use parmat::prelude::*;
//!
//! let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
//! let exec = Executor::new(Threads, 2)?;
//!
//! let sum = exec.sum(&a, &a)?;
//! let product = exec.multiply(&Matrix::identity(2)?, &a)?;
//!
//! assert_eq!(sum, Matrix::from_rows(&[[2.0, 4.0], [6.0, 8.0]])?);
//! assert_eq!(product, a);
//! # Ok::<(), parmat::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): the rayon pool backend and the `tasks` strategy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod formula;
pub mod kernels;
pub mod matrix;
pub mod ops;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formula::{Evaluator, Formula, Strategy};
    pub use crate::matrix::{Matrix, SampleData};
    pub use crate::ops::{MatrixOps, Reference};
    pub use crate::runtime::{Executor, ParallelismConfig, Sequential, Threads};

    #[cfg(feature = "rayon")]
    pub use crate::runtime::{ParallelFor, Pool};
}
