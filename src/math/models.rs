//! Gaussian and short-range-order model functions
//!
//! Both evaluators are plain expressions with no input validation: a zero
//! width or zero temperature yields `inf`/`nan` under IEEE-754 rules and the
//! value propagates to the caller untouched.

use crate::io::configuration::{GAUSSIAN_INITIAL_GUESS, SRO_INITIAL_GUESS};
use ndarray::{Array, ArrayBase, Data, Dimension};
use num_traits::Float;

/// Gaussian bell curve `a * exp(-0.5 * ((x - b) / c)^2)`
///
/// `a` is the amplitude, `b` the center and `c` the width.
pub fn gaussian<F: Float>(x: F, a: F, b: F, c: F) -> F {
    let z = (x - b) / c;
    let two = F::one() + F::one();
    a * (-(z * z) / two).exp()
}

/// Short-range-order correction `(exp(-a0 / t) - 1) * (a1 + a2 / t)`
pub fn sro_model<F: Float>(t: F, a0: F, a1: F, a2: F) -> F {
    ((-a0 / t).exp() - F::one()) * (a1 + a2 / t)
}

/// Element-wise [`gaussian`] over an array of any shape
pub fn gaussian_array<S, D>(x: &ArrayBase<S, D>, a: f64, b: f64, c: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|xi| gaussian(xi, a, b, c))
}

/// Element-wise [`sro_model`] over an array of temperatures of any shape
pub fn sro_model_array<S, D>(t: &ArrayBase<S, D>, a0: f64, a1: f64, a2: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    t.mapv(|ti| sro_model(ti, a0, a1, a2))
}

/// A scalar model `f(x; p)` with a fixed number of parameters
///
/// Implementors supply the analytic gradient with respect to the parameters,
/// which the curve fitter uses to build its Jacobian. A parameter slice of
/// the wrong length evaluates to `NaN`.
pub trait Model: Send + Sync {
    /// Number of free parameters
    const PARAMETERS: usize;

    /// Short identifier used in reports
    fn name(&self) -> &'static str;

    /// Evaluate the model at `x`
    fn evaluate(&self, x: f64, params: &[f64]) -> f64;

    /// Write `∂f/∂pᵢ` at `x` into `out`
    fn gradient(&self, x: f64, params: &[f64], out: &mut [f64]);
}

/// [`gaussian`] with parameters `[a, b, c]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gaussian;

impl Model for Gaussian {
    const PARAMETERS: usize = 3;

    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn evaluate(&self, x: f64, params: &[f64]) -> f64 {
        match *params {
            [a, b, c] => gaussian(x, a, b, c),
            _ => f64::NAN,
        }
    }

    fn gradient(&self, x: f64, params: &[f64], out: &mut [f64]) {
        match (params, out) {
            (&[a, b, c], [da, db, dc]) => {
                let z = (x - b) / c;
                let e = (-0.5 * z * z).exp();
                *da = e;
                *db = a * e * z / c;
                *dc = a * e * z * z / c;
            }
            (_, out) => out.fill(f64::NAN),
        }
    }
}

/// [`sro_model`] with parameters `[a0, a1, a2]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SroCorrection;

impl Model for SroCorrection {
    const PARAMETERS: usize = 3;

    fn name(&self) -> &'static str {
        "sro"
    }

    fn evaluate(&self, x: f64, params: &[f64]) -> f64 {
        match *params {
            [a0, a1, a2] => sro_model(x, a0, a1, a2),
            _ => f64::NAN,
        }
    }

    fn gradient(&self, x: f64, params: &[f64], out: &mut [f64]) {
        match (params, out) {
            (&[a0, a1, a2], [d0, d1, d2]) => {
                let inv_t = x.recip();
                let e = (-a0 * inv_t).exp();
                *d0 = -e * inv_t * a2.mul_add(inv_t, a1);
                *d1 = e - 1.0;
                *d2 = (e - 1.0) * inv_t;
            }
            (_, out) => out.fill(f64::NAN),
        }
    }
}

/// Runtime selection between the built-in models
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelKind {
    /// Gaussian bell curve, parameters `a b c`
    Gaussian,
    /// Short-range-order correction, parameters `a0 a1 a2`
    Sro,
}

impl ModelKind {
    /// Short identifier used in reports
    pub fn name(self) -> &'static str {
        match self {
            Self::Gaussian => Gaussian.name(),
            Self::Sro => SroCorrection.name(),
        }
    }

    /// Number of free parameters of the selected model
    pub const fn parameters(self) -> usize {
        match self {
            Self::Gaussian => Gaussian::PARAMETERS,
            Self::Sro => SroCorrection::PARAMETERS,
        }
    }

    /// Starting point used when no initial guess is given
    pub const fn initial_guess(self) -> [f64; 3] {
        match self {
            Self::Gaussian => GAUSSIAN_INITIAL_GUESS,
            Self::Sro => SRO_INITIAL_GUESS,
        }
    }

    /// Evaluate the selected model at `x`
    pub fn evaluate(self, x: f64, params: &[f64]) -> f64 {
        match self {
            Self::Gaussian => Gaussian.evaluate(x, params),
            Self::Sro => SroCorrection.evaluate(x, params),
        }
    }

    /// Evaluate the selected model at every element of `x`
    pub fn evaluate_array<S, D>(self, x: &ArrayBase<S, D>, params: &[f64]) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        x.mapv(|xi| self.evaluate(xi, params))
    }
}
