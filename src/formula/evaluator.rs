//! Strategy dispatch for formula evaluation

use super::fork::{Inline, ScopedThreads};
use super::phase::{Phase, Progress};
use super::{Formula, Strategy, graph, pipeline};
use crate::error::Result;
use crate::matrix::{Matrix, SampleData};
use crate::ops::Reference;
use crate::runtime::{Executor, ParallelismConfig, Threads};
use std::time::{Duration, Instant};
use tracing::info;

#[cfg(feature = "rayon")]
use super::fork::RayonJoin;
#[cfg(feature = "rayon")]
use crate::runtime::{Backend, ParallelFor, Pool};

#[derive(Clone, Debug)]
enum Engine {
    Sequential,
    Threads(Executor<Threads>),
    #[cfg(feature = "rayon")]
    Tasks(Executor<Pool>),
    #[cfg(feature = "rayon")]
    ParallelFor(Executor<ParallelFor>),
    Pipeline(Executor<Threads>),
}

/// Evaluates formulas under one strategy with a fixed worker count.
///
/// Executors (and, for the rayon strategies, a dedicated pool if the
/// configuration asks for one) are built once and reused by every call.
///
/// # Example
///
/// ```
/// use parmat::formula::{Evaluator, Formula, Strategy};
/// use parmat::matrix::SampleData;
/// use parmat::runtime::ParallelismConfig;
///
/// let data = SampleData::generate_seeded(8, 1.0, 100.0, 42)?;
/// let reference = Evaluator::new(Strategy::Sequential, &ParallelismConfig::default())?;
/// let threaded = Evaluator::new(Strategy::Threads, &ParallelismConfig::new(3))?;
///
/// assert_eq!(
///     reference.evaluate(Formula::A, &data)?,
///     threaded.evaluate(Formula::A, &data)?,
/// );
/// # Ok::<(), parmat::error::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Evaluator {
    strategy: Strategy,
    workers: usize,
    engine: Engine,
}

impl Evaluator {
    /// Build an evaluator for `strategy`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for an invalid configuration and
    /// `Error::Backend` if a dedicated pool cannot be built.
    pub fn new(strategy: Strategy, config: &ParallelismConfig) -> Result<Self> {
        config.validate()?;
        let engine = match strategy {
            Strategy::Sequential => Engine::Sequential,
            Strategy::Threads => Engine::Threads(Executor::from_config(Threads, config)?),
            #[cfg(feature = "rayon")]
            Strategy::Tasks => Engine::Tasks(Executor::from_config(Pool::from_config(config)?, config)?),
            #[cfg(feature = "rayon")]
            Strategy::ParallelFor => {
                Engine::ParallelFor(Executor::from_config(ParallelFor::from_config(config)?, config)?)
            }
            Strategy::Pipeline => Engine::Pipeline(Executor::from_config(Threads, config)?),
        };
        Ok(Self {
            strategy,
            workers: config.workers(),
            engine,
        })
    }

    /// The scheduling strategy
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Workers per matrix operation (unused by [`Strategy::Sequential`])
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate `formula` over `data`.
    ///
    /// Either the complete result is returned or the first error; no partial
    /// matrix is ever exposed.
    #[tracing::instrument(
        level = "info",
        skip(self, data),
        fields(strategy = %self.strategy, workers = self.workers, size = data.size()),
        err
    )]
    pub fn evaluate(&self, formula: Formula, data: &SampleData) -> Result<Matrix> {
        let started = Instant::now();
        let mut progress = Progress::new(formula, self.strategy);

        let result = match &self.engine {
            Engine::Sequential => graph::evaluate(&Inline, &Reference, formula, data, &mut progress),
            Engine::Threads(exec) => graph::evaluate(&ScopedThreads, exec, formula, data, &mut progress),
            #[cfg(feature = "rayon")]
            Engine::Tasks(exec) => exec
                .backend()
                .install(|| graph::evaluate(&RayonJoin, exec, formula, data, &mut progress)),
            #[cfg(feature = "rayon")]
            Engine::ParallelFor(exec) => exec
                .backend()
                .install(|| graph::evaluate(&RayonJoin, exec, formula, data, &mut progress)),
            Engine::Pipeline(exec) => pipeline::evaluate(exec, formula, data, &mut progress),
        }?;

        progress.enter(Phase::Done);
        info!(elapsed_us = elapsed_micros(started.elapsed()), "formula evaluated");
        Ok(result)
    }

    /// `D = B·(ME+MZ) − E·(MM+ME)`
    pub fn formula_a(&self, data: &SampleData) -> Result<Matrix> {
        self.evaluate(Formula::A, data)
    }

    /// `R = min(MM)·(ME+MZ) − ME·MM`
    pub fn formula_b(&self, data: &SampleData) -> Result<Matrix> {
        self.evaluate(Formula::B, data)
    }
}

/// Whole microseconds in `elapsed`, saturating at `u64::MAX`
fn elapsed_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
