//! Evaluation phases

use super::{Formula, Strategy};
use std::fmt;
use tracing::debug;

/// Where a formula evaluation currently is.
///
/// Every call walks the phases in declaration order:
/// `Idle → Dispatching → AwaitingDependencies → Combining → Done`.
/// A failed call stops in the phase it failed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing started
    Idle,
    /// Independent sub-expressions are being handed to workers
    Dispatching,
    /// Waiting on the branches the final step depends on
    AwaitingDependencies,
    /// Computing the final subtraction
    Combining,
    /// Result available
    Done,
}

impl Phase {
    /// The phase that follows this one, `None` for [`Phase::Done`]
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Dispatching),
            Phase::Dispatching => Some(Phase::AwaitingDependencies),
            Phase::AwaitingDependencies => Some(Phase::Combining),
            Phase::Combining => Some(Phase::Done),
            Phase::Done => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Dispatching => "dispatching",
            Phase::AwaitingDependencies => "awaiting-dependencies",
            Phase::Combining => "combining",
            Phase::Done => "done",
        })
    }
}

/// Phase tracker for one evaluation; every transition is logged.
#[derive(Debug)]
pub(crate) struct Progress {
    formula: Formula,
    strategy: Strategy,
    phase: Phase,
}

impl Progress {
    pub(crate) fn new(formula: Formula, strategy: Strategy) -> Self {
        Self {
            formula,
            strategy,
            phase: Phase::Idle,
        }
    }

    /// Move to `next`, which must directly follow the current phase.
    pub(crate) fn enter(&mut self, next: Phase) {
        debug_assert_eq!(self.phase.next(), Some(next), "phase skipped");
        debug!(
            formula = %self.formula,
            strategy = %self.strategy,
            from = %self.phase,
            to = %next,
            "phase"
        );
        self.phase = next;
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }
}
