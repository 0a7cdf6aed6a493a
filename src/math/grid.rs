//! Evenly spaced evaluation grids

use ndarray::Array1;

/// `n` evenly spaced values from `start` to `end`, both endpoints included
///
/// `n == 0` yields an empty array and `n == 1` yields `[start]`.
pub fn linspace(start: f64, end: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => Array1::linspace(start, end, n),
    }
}
