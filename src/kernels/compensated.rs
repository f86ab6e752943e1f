//! Summation accumulators and the compensated vector-matrix product

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Running sum of `f64` terms
pub trait Accumulator: Default {
    /// Add one term
    fn add(&mut self, term: f64);
    /// Current value of the sum
    fn value(&self) -> f64;
}

/// Plain left-to-right summation
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveSum {
    sum: f64,
}

impl Accumulator for NaiveSum {
    #[inline]
    fn add(&mut self, term: f64) {
        self.sum += term;
    }

    #[inline]
    fn value(&self) -> f64 {
        self.sum
    }
}

/// Kahan compensated summation.
///
/// `c` carries the low-order bits lost by the previous addition and is
/// subtracted from the next term before it is added.
#[derive(Clone, Copy, Debug, Default)]
pub struct KahanSum {
    sum: f64,
    c: f64,
}

impl Accumulator for KahanSum {
    #[inline]
    fn add(&mut self, term: f64) {
        let y = term - self.c;
        let t = self.sum + y;
        self.c = (t - self.sum) - y;
        self.sum = t;
    }

    #[inline]
    fn value(&self) -> f64 {
        self.sum
    }
}

/// Sum an iterator of terms with accumulator `A`
pub fn sum_with<A: Accumulator>(terms: impl IntoIterator<Item = f64>) -> f64 {
    let mut acc = A::default();
    for term in terms {
        acc.add(term);
    }
    acc.value()
}

/// Fail unless `v` can be multiplied by `m` from the left
pub fn check_vector_matrix_shape(v: &[f64], m: &Matrix) -> Result<()> {
    if v.len() != m.rows() {
        return Err(Error::shape_mismatch(
            "multiply_vector_by_matrix",
            &[v.len()],
            &m.shape(),
        ));
    }
    Ok(())
}

/// Column `col` of `v · m`: `Σ_k v[k] * m[k][col]`.
///
/// The caller guarantees `v.len() == m.rows()` and `col < m.cols()`.
#[inline]
pub fn dot_column<A: Accumulator>(v: &[f64], m: &Matrix, col: usize) -> f64 {
    sum_with::<A>(v.iter().zip(m.iter_rows()).map(|(&x, row)| x * row[col]))
}

/// Row vector times matrix, summing each column with accumulator `A`
pub fn multiply_vector_by_matrix_with<A: Accumulator>(v: &[f64], m: &Matrix) -> Result<Vec<f64>> {
    check_vector_matrix_shape(v, m)?;
    Ok((0..m.cols()).map(|col| dot_column::<A>(v, m, col)).collect())
}

/// Row vector times matrix with Kahan summation per output column
pub fn multiply_vector_by_matrix(v: &[f64], m: &Matrix) -> Result<Vec<f64>> {
    multiply_vector_by_matrix_with::<KahanSum>(v, m)
}
