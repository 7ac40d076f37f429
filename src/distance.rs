//! Parameterised Minkowski distance.
//!
//! `d(p, q) = (Σ |p_i - q_i|^z)^(1/z)` over the first `dims` components:
//! - `z = 1`: Manhattan
//! - `z = 2`: Euclidean
//! - `0 < z < 1`: fractional distance (not a metric, still symmetric and non-negative)
//!
//! Passing vectors whose length differs from `dims` is a programming error and panics.

/// Minkowski distance between `p` and `q` over `dims` components.
///
/// # Panics
///
/// Panics if either vector does not have exactly `dims` components.
///
/// # Examples
///
/// ```
/// use isrank::distance::distance;
/// assert!((distance(&[1.0, 1.0], &[4.0, 5.0], 2, 2.0) - 5.0).abs() < 1e-12);
/// assert!((distance(&[1.0, 1.0], &[4.0, 5.0], 2, 1.0) - 7.0).abs() < 1e-12);
/// ```
#[inline]
pub fn distance(p: &[f64], q: &[f64], dims: usize, z: f64) -> f64 {
    assert_eq!(p.len(), dims, "Dimension mismatch");
    assert_eq!(q.len(), dims, "Dimension mismatch");

    let sum: f64 = p
        .iter()
        .zip(q.iter())
        .map(|(a, b)| (a - b).abs().powf(z))
        .sum();

    sum.powf(1.0 / z)
}

/// Minkowski magnitude of `v`, i.e. its distance from the origin.
///
/// # Panics
///
/// Panics if `v` does not have exactly `dims` components.
#[inline]
pub fn norm(v: &[f64], dims: usize, z: f64) -> f64 {
    assert_eq!(v.len(), dims, "Dimension mismatch");

    let sum: f64 = v.iter().map(|x| x.abs().powf(z)).sum();
    sum.powf(1.0 / z)
}
