//! Sequential matrix kernels
//!
//! These are the single-threaded reference implementations. The parallel
//! operations call the same row-level helpers so their output is bit-identical.

use super::vector::{scale_vector_into, subtract_vectors_into, sum_vectors_into};
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Fail unless `a` and `b` have the same shape
pub fn check_same_shape(op: &'static str, a: &Matrix, b: &Matrix) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::shape_mismatch(op, &a.shape(), &b.shape()));
    }
    Ok(())
}

/// Output shape of `a · b`, or a shape error when the inner dimensions differ
pub fn multiply_output_shape(a: &Matrix, b: &Matrix) -> Result<[usize; 2]> {
    if a.cols() != b.rows() {
        return Err(Error::shape_mismatch("multiply", &a.shape(), &b.shape()));
    }
    Ok([a.rows(), b.cols()])
}

/// One output row of `a · b`: `out[j] = Σ_k a_row[k] * b[k][j]`.
///
/// Walks `b` row by row (i-k-j order) so both operands are read sequentially.
/// Each output cell accumulates its terms in increasing `k`.
///
/// The caller guarantees `a_row.len() == b.rows()` and `out.len() == b.cols()`.
#[inline]
pub fn multiply_row_into(a_row: &[f64], b: &Matrix, out: &mut [f64]) {
    debug_assert_eq!(a_row.len(), b.rows());
    debug_assert_eq!(out.len(), b.cols());

    out.fill(0.0);
    for (&a_val, b_row) in a_row.iter().zip(b.iter_rows()) {
        for (o, &b_val) in out.iter_mut().zip(b_row) {
            *o += a_val * b_val;
        }
    }
}

/// Elementwise `a + b`
pub fn sum_matrices(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_same_shape("sum", a, b)?;
    let mut out = Matrix::zeros(a.rows(), a.cols())?;
    sum_vectors_into(a.as_slice(), b.as_slice(), out.as_mut_slice())?;
    Ok(out)
}

/// Elementwise `a - b`
pub fn subtract_matrices(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_same_shape("subtract", a, b)?;
    let mut out = Matrix::zeros(a.rows(), a.cols())?;
    subtract_vectors_into(a.as_slice(), b.as_slice(), out.as_mut_slice())?;
    Ok(out)
}

/// Naive `O(n·k·m)` product `a · b`
pub fn multiply_matrices(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let [rows, cols] = multiply_output_shape(a, b)?;
    let mut out = Matrix::zeros(rows, cols)?;
    for i in 0..rows {
        multiply_row_into(a.row(i), b, out.row_mut(i));
    }
    Ok(out)
}

/// `m * scalar`, cell by cell
pub fn multiply_matrix_by_scalar(m: &Matrix, scalar: f64) -> Result<Matrix> {
    let mut out = Matrix::zeros(m.rows(), m.cols())?;
    scale_vector_into(m.as_slice(), scalar, out.as_mut_slice())?;
    Ok(out)
}
