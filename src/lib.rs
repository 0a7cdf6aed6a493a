//! Gaussian and short-range-order correction models for cluster-variation
//! thermodynamics, with Levenberg-Marquardt fitting to sampled data
//!
//! The free-energy correction between the ordered and disordered phases is
//! sampled over temperature and fitted with one of the model functions. The
//! model evaluators themselves are pure expressions that propagate IEEE-754
//! exceptional values rather than validating their inputs.

#![forbid(unsafe_code)]

/// Least-squares curve fitting and the linear algebra behind it
pub mod fitting;
/// Input/output operations, configuration and error handling
pub mod io;
/// Model functions and evaluation grids
pub mod math;

pub use io::error::{FitError, Result};
pub use math::models::{gaussian, sro_model};
