//! Producer/consumer evaluation over a bounded channel
//!
//! The producer computes the independent intermediates in a fixed order and
//! sends each one as soon as it is ready; the channel holds at most one item,
//! so the producer blocks while the consumer is busy. The consumer performs
//! the dependent step for each item as it arrives and combines once the
//! producer has hung up and the channel is drained.

use super::phase::{Phase, Progress};
use super::Formula;
use crate::error::{Error, Result};
use crate::matrix::{Matrix, SampleData};
use crate::ops::MatrixOps;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::{panic, thread};
use tracing::trace;

/// An intermediate result handed from producer to consumer
#[derive(Debug)]
enum Intermediate {
    /// ME + MZ
    SumMeMz(Matrix),
    /// MM + ME
    SumMmMe(Matrix),
    /// min(MM)
    MinMm(f64),
    /// ME · MM
    ProductMeMm(Matrix),
}

impl Intermediate {
    fn name(&self) -> &'static str {
        match self {
            Intermediate::SumMeMz(_) => "ME+MZ",
            Intermediate::SumMmMe(_) => "MM+ME",
            Intermediate::MinMm(_) => "min(MM)",
            Intermediate::ProductMeMm(_) => "ME*MM",
        }
    }
}

/// Number of items the producer sends for `formula`
fn expected_items(formula: Formula) -> usize {
    match formula {
        Formula::A => 2,
        Formula::B => 3,
    }
}

pub(crate) fn evaluate<O>(
    ops: &O,
    formula: Formula,
    data: &SampleData,
    progress: &mut Progress,
) -> Result<Matrix>
where
    O: MatrixOps + Sync,
{
    let (tx, rx) = bounded(1);

    progress.enter(Phase::Dispatching);
    thread::scope(|s| -> Result<Matrix> {
        let producer = thread::Builder::new()
            .name("parmat-producer".to_string())
            .spawn_scoped(s, move || produce(ops, formula, data, tx))?;

        progress.enter(Phase::AwaitingDependencies);
        let consumed = consume(ops, formula, data, rx, progress);

        let produced = match producer.join() {
            Ok(produced) => produced,
            Err(payload) => panic::resume_unwind(payload),
        };
        produced?;
        consumed
    })
}

/// Sends every intermediate of `formula`, stopping early if the consumer hung
/// up. Dropping `tx` on return signals completion.
fn produce<O: MatrixOps>(
    ops: &O,
    formula: Formula,
    data: &SampleData,
    tx: Sender<Intermediate>,
) -> Result<()> {
    let emit = |item: Intermediate| {
        let name = item.name();
        match tx.send(item) {
            Ok(()) => {
                trace!(item = name, "sent");
                true
            }
            Err(_) => {
                trace!(item = name, "consumer hung up");
                false
            }
        }
    };

    match formula {
        Formula::A => {
            if !emit(Intermediate::SumMeMz(ops.sum(data.me(), data.mz())?)) {
                return Ok(());
            }
            emit(Intermediate::SumMmMe(ops.sum(data.mm(), data.me())?));
        }
        Formula::B => {
            if !emit(Intermediate::SumMeMz(ops.sum(data.me(), data.mz())?)) {
                return Ok(());
            }
            if !emit(Intermediate::MinMm(ops.min(data.mm())?)) {
                return Ok(());
            }
            emit(Intermediate::ProductMeMm(ops.multiply(data.me(), data.mm())?));
        }
    }
    Ok(())
}

/// Partial results accumulated by the consumer
#[derive(Debug, Default)]
struct Assembly {
    sum: Option<Matrix>,
    min: Option<f64>,
    left: Option<Matrix>,
    right: Option<Matrix>,
}

impl Assembly {
    fn accept<O: MatrixOps>(&mut self, ops: &O, data: &SampleData, item: Intermediate) -> Result<()> {
        match item {
            Intermediate::SumMeMz(sum) => match self.min {
                // Formula B scales the sum once min(MM) is known
                Some(min) => self.left = Some(ops.scale(&sum, min)?),
                None => self.sum = Some(sum),
            },
            Intermediate::SumMmMe(sum) => self.right = Some(ops.multiply(data.e(), &sum)?),
            Intermediate::MinMm(min) => match self.sum.take() {
                Some(sum) => self.left = Some(ops.scale(&sum, min)?),
                None => self.min = Some(min),
            },
            Intermediate::ProductMeMm(product) => self.right = Some(product),
        }
        Ok(())
    }
}

/// Receives until the channel is disconnected and empty, then combines.
///
/// Returns early on the first failing step; dropping `rx` then unblocks the
/// producer.
fn consume<O: MatrixOps>(
    ops: &O,
    formula: Formula,
    data: &SampleData,
    rx: Receiver<Intermediate>,
    progress: &mut Progress,
) -> Result<Matrix> {
    let mut assembly = Assembly::default();
    let mut received = 0;

    for item in rx.iter() {
        received += 1;
        trace!(item = item.name(), received, "received");
        match (formula, item) {
            (Formula::A, Intermediate::SumMeMz(sum)) => {
                assembly.left = Some(ops.multiply(data.b(), &sum)?);
            }
            (_, item) => assembly.accept(ops, data, item)?,
        }
    }

    let (Some(left), Some(right)) = (assembly.left, assembly.right) else {
        return Err(Error::PipelineIncomplete {
            expected: expected_items(formula),
            received,
        });
    };

    progress.enter(Phase::Combining);
    ops.subtract(&left, &right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Strategy;
    use crate::formula::fork::Inline;
    use crate::formula::graph;
    use crate::ops::Reference;

    fn data() -> SampleData {
        SampleData::generate_seeded(5, 1.0, 100.0, 3).unwrap()
    }

    #[test]
    fn test_matches_fork_join() {
        let data = data();
        for formula in [Formula::A, Formula::B] {
            let mut p1 = Progress::new(formula, Strategy::Pipeline);
            let mut p2 = Progress::new(formula, Strategy::Sequential);
            let piped = evaluate(&Reference, formula, &data, &mut p1).unwrap();
            let forked = graph::evaluate(&Inline, &Reference, formula, &data, &mut p2).unwrap();
            assert_eq!(piped, forked);
            assert_eq!(p1.phase(), Phase::Combining);
        }
    }

    #[test]
    fn test_missing_items_are_reported() {
        let data = data();
        let (tx, rx) = bounded(1);
        let sum = Reference.sum(data.me(), data.mz()).unwrap();
        let producer = thread::spawn(move || {
            tx.send(Intermediate::SumMeMz(sum)).unwrap();
        });
        let mut progress = Progress::new(Formula::A, Strategy::Pipeline);
        progress.enter(Phase::Dispatching);
        progress.enter(Phase::AwaitingDependencies);
        let err = consume(&Reference, Formula::A, &data, rx, &mut progress).unwrap_err();
        producer.join().unwrap();
        assert!(matches!(
            err,
            Error::PipelineIncomplete {
                expected: 2,
                received: 1
            }
        ));
    }

    #[test]
    fn test_min_before_sum_is_accepted() {
        let data = data();
        let (tx, rx) = bounded(3);
        tx.send(Intermediate::MinMm(2.0)).unwrap();
        tx.send(Intermediate::ProductMeMm(Matrix::zeros(5, 5).unwrap())).unwrap();
        tx.send(Intermediate::SumMeMz(Matrix::filled(5, 5, 1.5).unwrap())).unwrap();
        drop(tx);
        let mut progress = Progress::new(Formula::B, Strategy::Pipeline);
        progress.enter(Phase::Dispatching);
        progress.enter(Phase::AwaitingDependencies);
        let out = consume(&Reference, Formula::B, &data, rx, &mut progress).unwrap();
        assert_eq!(out, Matrix::filled(5, 5, 3.0).unwrap());
    }
}
