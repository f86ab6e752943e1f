//! Minimum reduction kernels
//!
//! Every partial minimum starts from `+inf` and only replaces its accumulator on
//! a strict `<`, so NaN cells never win and ties keep the earliest cell. Partial
//! minima of disjoint row ranges combined in range order give exactly the
//! sequential result.

use crate::matrix::Matrix;
use std::ops::Range;

/// Smallest value in `values`, `+inf` if empty or all NaN
#[inline]
pub fn min_of_slice(values: &[f64]) -> f64 {
    values
        .iter()
        .fold(f64::INFINITY, |acc, &x| combine_min(acc, x))
}

/// Combine two partial minima
#[inline]
pub fn combine_min(acc: f64, x: f64) -> f64 {
    if x < acc { x } else { acc }
}

/// Minimum over the rows in `rows`.
///
/// # Panics
/// Panics if `rows.end > m.rows()`.
pub fn min_of_rows(m: &Matrix, rows: Range<usize>) -> f64 {
    let cols = m.cols();
    min_of_slice(&m.as_slice()[rows.start * cols..rows.end * cols])
}

/// Global minimum over every cell of `m`
pub fn min_of_matrix(m: &Matrix) -> f64 {
    min_of_slice(m.as_slice())
}
