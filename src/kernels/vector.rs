//! Elementwise vector kernels

use crate::error::{Error, Result};

#[inline]
fn check_lengths(op: &'static str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::shape_mismatch(op, &[a.len()], &[b.len()]));
    }
    Ok(())
}

/// `out[i] = a[i] + b[i]`
pub fn sum_vectors_into(a: &[f64], b: &[f64], out: &mut [f64]) -> Result<()> {
    check_lengths("sum_vectors", a, b)?;
    check_lengths("sum_vectors", a, out)?;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x + y;
    }
    Ok(())
}

/// `out[i] = a[i] - b[i]`
pub fn subtract_vectors_into(a: &[f64], b: &[f64], out: &mut [f64]) -> Result<()> {
    check_lengths("subtract_vectors", a, b)?;
    check_lengths("subtract_vectors", a, out)?;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x - y;
    }
    Ok(())
}

/// `out[i] = v[i] * scalar`
pub fn scale_vector_into(v: &[f64], scalar: f64, out: &mut [f64]) -> Result<()> {
    check_lengths("multiply_vector_by_scalar", v, out)?;
    for (o, &x) in out.iter_mut().zip(v) {
        *o = x * scalar;
    }
    Ok(())
}

/// Elementwise sum of two equally long vectors
pub fn sum_vectors(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; a.len()];
    sum_vectors_into(a, b, &mut out)?;
    Ok(out)
}

/// Elementwise difference of two equally long vectors
pub fn subtract_vectors(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; a.len()];
    subtract_vectors_into(a, b, &mut out)?;
    Ok(out)
}

/// Scale every element of `v`
pub fn multiply_vector_by_scalar(v: &[f64], scalar: f64) -> Vec<f64> {
    v.iter().map(|&x| x * scalar).collect()
}

/// Smallest element, or `None` for an empty vector. NaN elements are skipped.
pub fn min_of_vector(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(super::reduce::min_of_slice(v))
}

/// Largest element, or `None` for an empty vector. NaN elements are skipped.
pub fn max_of_vector(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(
        v.iter()
            .fold(f64::NEG_INFINITY, |acc, &x| if x > acc { x } else { acc }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_subtract() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, -2.0, 10.0];
        assert_eq!(sum_vectors(&a, &b).unwrap(), vec![1.5, 0.0, 13.0]);
        assert_eq!(subtract_vectors(&a, &b).unwrap(), vec![0.5, 4.0, -7.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = sum_vectors(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch { op: "sum_vectors", .. }
        ));
        let mut out = [0.0; 1];
        assert!(subtract_vectors_into(&[1.0, 2.0], &[3.0, 4.0], &mut out).is_err());
    }

    #[test]
    fn test_scale() {
        assert_eq!(multiply_vector_by_scalar(&[1.0, -2.0], 3.0), vec![3.0, -6.0]);
    }

    #[test]
    fn test_min_max() {
        let v = [f64::NAN, 3.0, -1.5, 8.0];
        assert_eq!(min_of_vector(&v), Some(-1.5));
        assert_eq!(max_of_vector(&v), Some(8.0));
        assert_eq!(min_of_vector(&[]), None);
    }
}
