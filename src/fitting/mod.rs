//! Least-squares fitting of the model functions to sampled data

/// Levenberg-Marquardt curve fitting
pub mod curve;
/// LU-based dense linear solves for the normal equations
pub mod linear;
