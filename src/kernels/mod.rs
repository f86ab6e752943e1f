//! Sequential matrix and vector kernels
//!
//! Pure functions over already-sized buffers or returning freshly allocated
//! results. They never spawn work; the parallel operations in [`crate::ops`]
//! drive them row by row (or column by column) through an executor.

pub mod compensated;
pub mod matrix;
pub mod reduce;
pub mod vector;

pub use compensated::{
    Accumulator, KahanSum, NaiveSum, check_vector_matrix_shape, dot_column, multiply_vector_by_matrix,
    multiply_vector_by_matrix_with, sum_with,
};
pub use matrix::{
    check_same_shape, multiply_matrices, multiply_matrix_by_scalar, multiply_output_shape,
    multiply_row_into, subtract_matrices, sum_matrices,
};
pub use reduce::{combine_min, min_of_matrix, min_of_rows, min_of_slice};
pub use vector::{
    max_of_vector, min_of_vector, multiply_vector_by_scalar, scale_vector_into, subtract_vectors,
    subtract_vectors_into, sum_vectors, sum_vectors_into,
};
