//! Common test utilities
#![allow(dead_code)]

use parmat::prelude::*;

/// Worker counts every parallel operation is checked with: 1, 2, 5 and `n`
pub fn worker_counts(n: usize) -> [usize; 4] {
    [1, 2, 5, n]
}

/// One executor per backend compiled into this build
#[allow(unused_mut)]
pub fn executors(workers: usize) -> Vec<(&'static str, Box<dyn MatrixOps>)> {
    let mut out: Vec<(&'static str, Box<dyn MatrixOps>)> = vec![
        ("sequential", Box::new(Executor::new(Sequential, workers).unwrap())),
        ("threads", Box::new(Executor::new(Threads, workers).unwrap())),
    ];
    #[cfg(feature = "rayon")]
    {
        out.push(("pool", Box::new(Executor::new(Pool::global(), workers).unwrap())));
        out.push((
            "dedicated-pool",
            Box::new(Executor::new(Pool::with_threads(2).unwrap(), workers).unwrap()),
        ));
        out.push((
            "parallel-for",
            Box::new(Executor::new(ParallelFor::global(), workers).unwrap()),
        ));
    }
    out
}

/// Seeded sample data with values in [1, 100)
pub fn sample(size: usize, seed: u64) -> SampleData {
    SampleData::generate_seeded(size, 1.0, 100.0, seed).unwrap()
}

/// Sample data whose five matrices are all the `n × n` identity
pub fn identity_data(n: usize) -> SampleData {
    let i = Matrix::identity(n).unwrap();
    SampleData::new(i.clone(), i.clone(), i.clone(), i.clone(), i).unwrap()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two matrices have the same shape and bit-identical cells
pub fn assert_bit_identical(a: &Matrix, b: &Matrix, msg: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", msg);
    for (i, (x, y)) in a.as_slice().iter().zip(b.as_slice()).enumerate() {
        assert_eq!(
            x.to_bits(),
            y.to_bits(),
            "{}: element {} differs: {} vs {}",
            msg,
            i,
            x,
            y
        );
    }
}
