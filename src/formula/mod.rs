//! Formula evaluation
//!
//! Two fixed expressions over a [`SampleData`](crate::matrix::SampleData):
//!
//! - Formula A: `D = B·(ME+MZ) − E·(MM+ME)`
//! - Formula B: `R = min(MM)·(ME+MZ) − ME·MM`
//!
//! An [`Evaluator`] computes them under one [`Strategy`]. Independent
//! sub-expressions run concurrently and every strategy waits only at the
//! dependency edges of the expression, so all strategies return the same
//! matrix.

mod evaluator;
mod fork;
mod graph;
mod phase;
mod pipeline;

pub use evaluator::Evaluator;
pub use phase::Phase;

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One of the two fixed expressions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Formula {
    /// `B·(ME+MZ) − E·(MM+ME)`
    A,
    /// `min(MM)·(ME+MZ) − ME·MM`
    B,
}

impl Formula {
    /// Both formulas
    pub const ALL: [Formula; 2] = [Formula::A, Formula::B];

    /// The expression as text
    pub fn expression(self) -> &'static str {
        match self {
            Formula::A => "D = B*(ME+MZ) - E*(MM+ME)",
            Formula::B => "R = min(MM)*(ME+MZ) - ME*MM",
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Formula::A => "a",
            Formula::B => "b",
        })
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(Formula::A),
            "b" => Ok(Formula::B),
            other => Err(Error::invalid_argument(
                "formula",
                format!("unknown formula '{other}', expected 'a' or 'b'"),
            )),
        }
    }
}

/// How the sub-expressions of a formula are scheduled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Sequential kernels on the calling thread; the reference result
    Sequential,
    /// Scoped OS threads per branch, operations on the threads backend
    Threads,
    /// `rayon::join` per branch, operations on the pool backend
    #[cfg(feature = "rayon")]
    Tasks,
    /// `rayon::join` per branch, operations as parallel loops over row chunks
    #[cfg(feature = "rayon")]
    ParallelFor,
    /// Producer/consumer over a bounded channel of capacity one
    Pipeline,
}

impl Strategy {
    /// Every strategy compiled into this build
    pub const ALL: &'static [Strategy] = &[
        Strategy::Sequential,
        Strategy::Threads,
        #[cfg(feature = "rayon")]
        Strategy::Tasks,
        #[cfg(feature = "rayon")]
        Strategy::ParallelFor,
        Strategy::Pipeline,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Sequential => "sequential",
            Strategy::Threads => "threads",
            #[cfg(feature = "rayon")]
            Strategy::Tasks => "tasks",
            #[cfg(feature = "rayon")]
            Strategy::ParallelFor => "parallel-for",
            Strategy::Pipeline => "pipeline",
        })
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.to_ascii_lowercase();
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.to_string() == s)
            .ok_or_else(|| Error::invalid_argument("strategy", format!("unknown strategy '{s}'")))
    }
}
