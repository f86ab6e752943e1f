//! `MatrixOps` for every executor backend

use super::MatrixOps;
use crate::error::Result;
use crate::kernels::{
    KahanSum, check_same_shape, check_vector_matrix_shape, combine_min, dot_column,
    min_of_rows, multiply_output_shape, multiply_row_into, scale_vector_into,
    subtract_vectors_into, sum_vectors_into,
};
use crate::matrix::Matrix;
use crate::runtime::{Backend, Executor};
use parking_lot::Mutex;

impl<B: Backend> MatrixOps for Executor<B> {
    fn sum(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        check_same_shape("sum", a, b)?;
        let mut out = Matrix::zeros(a.rows(), a.cols())?;
        self.for_each_chunk_mut(out.as_mut_slice(), a.cols(), |i, row| {
            sum_vectors_into(a.row(i), b.row(i), row)
        })?;
        Ok(out)
    }

    fn subtract(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        check_same_shape("subtract", a, b)?;
        let mut out = Matrix::zeros(a.rows(), a.cols())?;
        self.for_each_chunk_mut(out.as_mut_slice(), a.cols(), |i, row| {
            subtract_vectors_into(a.row(i), b.row(i), row)
        })?;
        Ok(out)
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let [rows, cols] = multiply_output_shape(a, b)?;
        let mut out = Matrix::zeros(rows, cols)?;
        self.for_each_chunk_mut(out.as_mut_slice(), cols, |i, row| {
            multiply_row_into(a.row(i), b, row);
            Ok(())
        })?;
        Ok(out)
    }

    fn scale(&self, m: &Matrix, scalar: f64) -> Result<Matrix> {
        let mut out = Matrix::zeros(m.rows(), m.cols())?;
        self.for_each_chunk_mut(out.as_mut_slice(), m.cols(), |i, row| {
            scale_vector_into(m.row(i), scalar, row)
        })?;
        Ok(out)
    }

    fn min(&self, m: &Matrix) -> Result<f64> {
        let partials = self.map_ranges(0, m.rows(), |range| Ok(min_of_rows(m, range.indices())))?;
        Ok(partials.into_iter().fold(f64::INFINITY, combine_min))
    }

    fn multiply_vector(&self, v: &[f64], m: &Matrix) -> Result<Vec<f64>> {
        check_vector_matrix_shape(v, m)?;
        let mut out = vec![0.0; m.cols()];
        self.for_each_chunk_mut(&mut out, 1, |col, cell| {
            cell[0] = dot_column::<KahanSum>(v, m, col);
            Ok(())
        })?;
        Ok(out)
    }
}

impl<B: Backend> Executor<B> {
    /// Smallest cell of `m`, folded into one shared accumulator.
    ///
    /// Each worker scans its rows without holding the lock, then takes it once
    /// to compare and update. Gives the same value as [`MatrixOps::min`].
    pub fn min_locked(&self, m: &Matrix) -> Result<f64> {
        let shared = Mutex::new(f64::INFINITY);
        self.map_ranges(0, m.rows(), |range| {
            let local = min_of_rows(m, range.indices());
            let mut current = shared.lock();
            *current = combine_min(*current, local);
            Ok(())
        })?;
        Ok(shared.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::kernels::{multiply_matrices, multiply_vector_by_matrix, sum_matrices};
    use crate::runtime::{Sequential, Threads};

    fn grid(rows: usize, cols: usize) -> Matrix {
        Matrix::from_fn(rows, cols, |i, j| (i * cols + j) as f64 * 0.37 - 4.0).unwrap()
    }

    #[test]
    fn test_sum_matches_kernel() {
        let a = grid(7, 4);
        let b = Matrix::filled(7, 4, 1.5).unwrap();
        let exec = Executor::new(Threads, 3).unwrap();
        assert_eq!(exec.sum(&a, &b).unwrap(), sum_matrices(&a, &b).unwrap());
    }

    #[test]
    fn test_subtract_self_is_zero() {
        let a = grid(5, 5);
        let exec = Executor::new(Sequential, 2).unwrap();
        let diff = exec.subtract(&a, &a).unwrap();
        assert!(diff.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_multiply_matches_kernel() {
        let a = grid(6, 3);
        let b = grid(3, 5);
        let exec = Executor::new(Threads, 4).unwrap();
        assert_eq!(exec.multiply(&a, &b).unwrap(), multiply_matrices(&a, &b).unwrap());
    }

    #[test]
    fn test_multiply_shape_mismatch() {
        let exec = Executor::new(Sequential, 2).unwrap();
        let err = exec.multiply(&grid(3, 3), &grid(2, 2)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { op: "multiply", .. }));
    }

    #[test]
    fn test_scale() {
        let exec = Executor::new(Sequential, 3).unwrap();
        let out = exec.scale(&Matrix::filled(2, 3, 2.0).unwrap(), -0.5).unwrap();
        assert_eq!(out, Matrix::filled(2, 3, -1.0).unwrap());
    }

    #[test]
    fn test_min_and_min_locked_agree() {
        let mut m = grid(9, 4);
        m[(6, 2)] = -100.0;
        m[(1, 1)] = f64::NAN;
        for workers in [1, 2, 9, 14] {
            let exec = Executor::new(Threads, workers).unwrap();
            assert_eq!(exec.min(&m).unwrap(), -100.0);
            assert_eq!(exec.min_locked(&m).unwrap(), -100.0);
        }
    }

    #[test]
    fn test_multiply_vector_matches_kernel() {
        let m = grid(4, 6);
        let v = [1.0, -2.0, 0.5, 3.0];
        let exec = Executor::new(Threads, 4).unwrap();
        assert_eq!(
            exec.multiply_vector(&v, &m).unwrap(),
            multiply_vector_by_matrix(&v, &m).unwrap()
        );
        assert!(exec.multiply_vector(&v[..3], &m).is_err());
    }

    #[test]
    fn test_more_workers_than_rows() {
        let exec = Executor::new(Threads, 10).unwrap();
        let out = exec
            .sum(&Matrix::filled(2, 2, 1.0).unwrap(), &Matrix::filled(2, 2, 2.0).unwrap())
            .unwrap();
        assert_eq!(out, Matrix::filled(2, 2, 3.0).unwrap());
    }
}
