//! Formula dependency graphs over a fork/join primitive
//!
//! ```text
//! A:  ME+MZ ──► B·(ME+MZ) ──┐
//!                            ├──► left − right
//!     MM+ME ──► E·(MM+ME) ──┘
//!
//! B:  ME+MZ ──┐
//!             ├──► min(MM)·(ME+MZ) ──┐
//!     min(MM) ┘                       ├──► left − right
//!     ME·MM ─────────────────────────┘
//! ```
//!
//! Each arrow is a dependency edge; nodes without an edge between them run
//! on opposite sides of a fork. `AwaitingDependencies` is entered once the
//! outer fork has handed out both branches.

use super::fork::Fork;
use super::phase::{Phase, Progress};
use super::Formula;
use crate::error::Result;
use crate::matrix::{Matrix, SampleData};
use crate::ops::MatrixOps;

pub(crate) fn evaluate<F, O>(
    fork: &F,
    ops: &O,
    formula: Formula,
    data: &SampleData,
    progress: &mut Progress,
) -> Result<Matrix>
where
    F: Fork,
    O: MatrixOps + Sync,
{
    progress.enter(Phase::Dispatching);
    let (left, right) = match formula {
        Formula::A => branches_a(fork, ops, data, progress),
        Formula::B => branches_b(fork, ops, data, progress),
    };
    let (left, right) = (left?, right?);

    progress.enter(Phase::Combining);
    ops.subtract(&left, &right)
}

fn branches_a<F, O>(
    fork: &F,
    ops: &O,
    data: &SampleData,
    progress: &mut Progress,
) -> (Result<Matrix>, Result<Matrix>)
where
    F: Fork,
    O: MatrixOps + Sync,
{
    fork.join_launched(
        || {
            let sum = ops.sum(data.me(), data.mz())?;
            ops.multiply(data.b(), &sum)
        },
        || {
            let sum = ops.sum(data.mm(), data.me())?;
            ops.multiply(data.e(), &sum)
        },
        || progress.enter(Phase::AwaitingDependencies),
    )
}

fn branches_b<F, O>(
    fork: &F,
    ops: &O,
    data: &SampleData,
    progress: &mut Progress,
) -> (Result<Matrix>, Result<Matrix>)
where
    F: Fork,
    O: MatrixOps + Sync,
{
    fork.join_launched(
        || {
            let (sum, min) = fork.join(|| ops.sum(data.me(), data.mz()), || ops.min(data.mm()));
            ops.scale(&sum?, min?)
        },
        || ops.multiply(data.me(), data.mm()),
        || progress.enter(Phase::AwaitingDependencies),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Strategy;
    use crate::formula::fork::{Inline, ScopedThreads};
    use crate::ops::Reference;
    use parking_lot::{Condvar, Mutex};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[cfg(feature = "rayon")]
    use crate::formula::fork::RayonJoin;

    fn identity_data() -> SampleData {
        let i = Matrix::identity(2).unwrap();
        SampleData::new(i.clone(), i.clone(), i.clone(), i.clone(), i).unwrap()
    }

    #[test]
    fn test_identity_inputs() {
        let data = identity_data();
        let mut progress = Progress::new(Formula::A, Strategy::Sequential);
        let a = evaluate(&Inline, &Reference, Formula::A, &data, &mut progress).unwrap();
        assert_eq!(a, Matrix::zeros(2, 2).unwrap());
        assert_eq!(progress.phase(), Phase::Combining);

        let mut progress = Progress::new(Formula::B, Strategy::Threads);
        let b = evaluate(&ScopedThreads, &Reference, Formula::B, &data, &mut progress).unwrap();
        // min(I) is 0, leaving only -I·I
        assert_eq!(b, Matrix::from_rows(&[[-1.0, 0.0], [0.0, -1.0]]).unwrap());
    }

    /// Delegates to [`Reference`], but every `sum` and `min` call waits until
    /// two of them are in flight at once, or until `timeout` passes.
    struct Rendezvous {
        arrived: Mutex<usize>,
        all_here: Condvar,
        timeout: Duration,
        missed: AtomicBool,
    }

    impl Rendezvous {
        fn new(timeout: Duration) -> Self {
            Self {
                arrived: Mutex::new(0),
                all_here: Condvar::new(),
                timeout,
                missed: AtomicBool::new(false),
            }
        }

        fn arrive(&self) {
            let mut arrived = self.arrived.lock();
            *arrived += 1;
            if *arrived >= 2 {
                self.all_here.notify_all();
                return;
            }
            let waited = self
                .all_here
                .wait_while_for(&mut arrived, |n| *n < 2, self.timeout);
            if waited.timed_out() {
                self.missed.store(true, Ordering::SeqCst);
            }
        }

        fn met(&self) -> bool {
            !self.missed.load(Ordering::SeqCst)
        }
    }

    impl MatrixOps for Rendezvous {
        fn sum(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
            self.arrive();
            Reference.sum(a, b)
        }

        fn subtract(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
            Reference.subtract(a, b)
        }

        fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
            Reference.multiply(a, b)
        }

        fn scale(&self, m: &Matrix, scalar: f64) -> Result<Matrix> {
            Reference.scale(m, scalar)
        }

        fn min(&self, m: &Matrix) -> Result<f64> {
            self.arrive();
            Reference.min(m)
        }

        fn multiply_vector(&self, v: &[f64], m: &Matrix) -> Result<Vec<f64>> {
            Reference.multiply_vector(v, m)
        }
    }

    /// Whether the two independent leaves of `formula` ran at the same time
    fn leaves_overlap<F: Fork>(fork: &F, formula: Formula, timeout: Duration) -> bool {
        let data = SampleData::generate_seeded(4, 1.0, 10.0, 21).unwrap();
        let ops = Rendezvous::new(timeout);
        let mut progress = Progress::new(formula, Strategy::Threads);
        let out = evaluate(fork, &ops, formula, &data, &mut progress).unwrap();

        let mut check = Progress::new(formula, Strategy::Sequential);
        assert_eq!(out, evaluate(&Inline, &Reference, formula, &data, &mut check).unwrap());
        ops.met()
    }

    #[test]
    fn test_independent_leaves_run_concurrently() {
        // A: ME+MZ with MM+ME; B: ME+MZ with min(MM)
        for formula in Formula::ALL {
            assert!(leaves_overlap(&ScopedThreads, formula, Duration::from_secs(10)), "{formula}");

            #[cfg(feature = "rayon")]
            {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
                assert!(
                    pool.install(|| leaves_overlap(&RayonJoin, formula, Duration::from_secs(10))),
                    "{formula}"
                );
            }

            assert!(!leaves_overlap(&Inline, formula, Duration::from_millis(50)), "{formula}");
        }
    }

    #[test]
    fn test_forks_agree() {
        let data = SampleData::generate_seeded(6, 1.0, 100.0, 11).unwrap();
        for formula in [Formula::A, Formula::B] {
            let mut p1 = Progress::new(formula, Strategy::Sequential);
            let mut p2 = Progress::new(formula, Strategy::Threads);
            assert_eq!(
                evaluate(&Inline, &Reference, formula, &data, &mut p1).unwrap(),
                evaluate(&ScopedThreads, &Reference, formula, &data, &mut p2).unwrap()
            );
        }
    }
}
