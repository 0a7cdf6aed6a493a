//! Model functions and grid helpers

/// Evenly spaced evaluation grids
pub mod grid;
/// Gaussian and short-range-order model evaluators
pub mod models;
