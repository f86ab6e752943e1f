//! `MatrixOps` straight on the sequential kernels

use super::MatrixOps;
use crate::error::Result;
use crate::kernels::{
    min_of_matrix, multiply_matrices, multiply_matrix_by_scalar, multiply_vector_by_matrix,
    subtract_matrices, sum_matrices,
};
use crate::matrix::Matrix;

/// Calls the sequential kernels directly, without partitioning.
///
/// This is the baseline every parallel result is compared against.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reference;

impl MatrixOps for Reference {
    fn sum(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        sum_matrices(a, b)
    }

    fn subtract(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        subtract_matrices(a, b)
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        multiply_matrices(a, b)
    }

    fn scale(&self, m: &Matrix, scalar: f64) -> Result<Matrix> {
        multiply_matrix_by_scalar(m, scalar)
    }

    fn min(&self, m: &Matrix) -> Result<f64> {
        Ok(min_of_matrix(m))
    }

    fn multiply_vector(&self, v: &[f64], m: &Matrix) -> Result<Vec<f64>> {
        multiply_vector_by_matrix(v, m)
    }
}
