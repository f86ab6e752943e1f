//! Matrix operations trait.

use crate::error::Result;
use crate::matrix::Matrix;

/// Matrix operations driven over a partitioned index space
pub trait MatrixOps {
    /// Elementwise sum: a + b
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if `a` and `b` differ in shape.
    fn sum(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;

    /// Elementwise difference: a - b
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if `a` and `b` differ in shape.
    fn subtract(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;

    /// Matrix product: a · b
    ///
    /// Rows of the output are computed independently; `b` is read by every
    /// worker.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if `a.cols() != b.rows()`.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;

    /// Scale every cell: m * scalar
    fn scale(&self, m: &Matrix, scalar: f64) -> Result<Matrix>;

    /// Smallest cell of `m`.
    ///
    /// NaN cells are ignored; a matrix of only NaN yields `+inf`.
    fn min(&self, m: &Matrix) -> Result<f64>;

    /// Row vector times matrix: v · m, with compensated summation per column
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if `v.len() != m.rows()`.
    fn multiply_vector(&self, v: &[f64], m: &Matrix) -> Result<Vec<f64>>;
}
