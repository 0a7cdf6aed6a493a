//! Non-linear least-squares curve fitting with Levenberg-Marquardt
//!
//! Minimises `Σ (yᵢ - f(xᵢ; p))²` over the parameters of a [`Model`]. The
//! damping term is scaled by the diagonal of `JᵀJ` (Marquardt scaling) so the
//! fit behaves the same regardless of the units of each parameter.

use crate::fitting::linear;
use crate::io::configuration::{
    DAMPING_FACTOR, DEFAULT_GRADIENT_TOLERANCE, DEFAULT_INITIAL_DAMPING, DEFAULT_MAX_ITERATIONS,
    DEFAULT_X_TOLERANCE, DIAGONAL_FLOOR, MAX_DAMPING, MIN_DAMPING,
};
use crate::io::error::{FitError, Result, computation_error, invalid_parameter};
use crate::math::models::{Gaussian, Model, ModelKind, SroCorrection};
use ndarray::{Array1, Array2};
use std::fmt;

/// Stopping criteria and damping schedule for [`curve_fit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Maximum number of damped steps attempted
    pub max_iterations: usize,
    /// Converged once every step component satisfies `|δᵢ| < xtol·(|pᵢ| + xtol)`
    pub x_tolerance: f64,
    /// Converged once `‖Jᵀr‖∞` drops below this value
    pub gradient_tolerance: f64,
    /// Damping factor of the first iteration
    pub initial_damping: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            x_tolerance: DEFAULT_X_TOLERANCE,
            gradient_tolerance: DEFAULT_GRADIENT_TOLERANCE,
            initial_damping: DEFAULT_INITIAL_DAMPING,
        }
    }
}

impl FitOptions {
    fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("x_tolerance", self.x_tolerance),
            ("gradient_tolerance", self.gradient_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &"must be finite and non-negative",
                ));
            }
        }

        if !(self.initial_damping.is_finite() && self.initial_damping > 0.0) {
            return Err(invalid_parameter(
                "initial_damping",
                &self.initial_damping,
                &"must be finite and positive",
            ));
        }

        Ok(())
    }
}

/// Why the fitter stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The gradient of the cost vanished
    GradientTolerance,
    /// Steps became negligible relative to the parameters
    StepTolerance,
    /// The iteration cap was reached first
    MaxIterations,
}

impl Termination {
    /// Whether the fit stopped on a convergence criterion
    pub const fn converged(self) -> bool {
        !matches!(self, Self::MaxIterations)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::GradientTolerance => "gradient-tolerance",
            Self::StepTolerance => "step-tolerance",
            Self::MaxIterations => "max-iterations",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful [`curve_fit`]
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Name of the fitted model
    pub model: &'static str,
    /// Fitted parameters in model order
    pub params: Array1<f64>,
    /// `Σ (yᵢ - f(xᵢ; p))²` at the fitted parameters
    pub residual_sum_of_squares: f64,
    /// Number of damped steps attempted
    pub iterations: usize,
    /// Stopping reason
    pub termination: Termination,
}

/// Fit `model` to the points `(x, y)` starting from `initial`
///
/// # Errors
///
/// Returns an error if:
/// - `x` and `y` differ in length, or `initial` does not match the model's
///   parameter count
/// - There are fewer points than parameters
/// - Any input or option is non-finite or out of range
/// - The model is not finite at the initial parameters
pub fn curve_fit<M: Model>(
    model: &M,
    initial: &[f64],
    x: &Array1<f64>,
    y: &Array1<f64>,
    options: &FitOptions,
) -> Result<FitReport> {
    validate_inputs::<M>(initial, x, y)?;
    options.validate()?;

    let mut params = Array1::from(initial.to_vec());
    let mut cost = sum_of_squares(model, &params, x, y);
    if !cost.is_finite() {
        return Err(computation_error(
            "curve_fit",
            &format!("{} is not finite at the initial parameters", model.name()),
        ));
    }

    let (mut jtj, mut jtr) = normal_equations(model, &params, x, y);
    let mut lambda = options.initial_damping;
    let mut iterations = 0;
    let mut termination = Termination::MaxIterations;

    while iterations < options.max_iterations {
        if infinity_norm(&jtr) < options.gradient_tolerance {
            termination = Termination::GradientTolerance;
            break;
        }
        iterations += 1;

        let step = match linear::solve(&damped(&jtj, lambda), &jtr) {
            Ok(step) => step,
            Err(FitError::SingularMatrix { .. }) => {
                lambda *= DAMPING_FACTOR;
                if lambda > MAX_DAMPING {
                    termination = Termination::StepTolerance;
                    break;
                }
                continue;
            }
            Err(error) => return Err(error),
        };

        let negligible = step_is_negligible(&step, &params, options.x_tolerance);
        let candidate = &params + &step;
        let candidate_cost = sum_of_squares(model, &candidate, x, y);

        if candidate_cost.is_finite() && candidate_cost < cost {
            params = candidate;
            cost = candidate_cost;
            lambda = (lambda / DAMPING_FACTOR).max(MIN_DAMPING);
            (jtj, jtr) = normal_equations(model, &params, x, y);
        } else {
            lambda *= DAMPING_FACTOR;
        }

        if negligible || lambda > MAX_DAMPING {
            termination = Termination::StepTolerance;
            break;
        }
    }

    Ok(FitReport {
        model: model.name(),
        params,
        residual_sum_of_squares: cost,
        iterations,
        termination,
    })
}

fn validate_inputs<M: Model>(initial: &[f64], x: &Array1<f64>, y: &Array1<f64>) -> Result<()> {
    if x.len() != y.len() {
        return Err(FitError::DimensionMismatch {
            context: "curve_fit (x and y)",
            expected: x.len(),
            found: y.len(),
        });
    }
    if initial.len() != M::PARAMETERS {
        return Err(FitError::DimensionMismatch {
            context: "curve_fit (initial parameters)",
            expected: M::PARAMETERS,
            found: initial.len(),
        });
    }
    if x.len() < M::PARAMETERS {
        return Err(FitError::InsufficientData {
            points: x.len(),
            required: M::PARAMETERS,
        });
    }

    if let Some(value) = initial.iter().find(|v| !v.is_finite()) {
        return Err(invalid_parameter("initial", value, &"must be finite"));
    }
    if let Some(value) = x.iter().find(|v| !v.is_finite()) {
        return Err(invalid_parameter("x", value, &"must be finite"));
    }
    if let Some(value) = y.iter().find(|v| !v.is_finite()) {
        return Err(invalid_parameter("y", value, &"must be finite"));
    }

    Ok(())
}

fn sum_of_squares<M: Model>(
    model: &M,
    params: &Array1<f64>,
    x: &Array1<f64>,
    y: &Array1<f64>,
) -> f64 {
    let p = params.as_slice().unwrap_or(&[]);
    x.iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| {
            let r = yi - model.evaluate(xi, p);
            r * r
        })
        .sum()
}

/// Builds `JᵀJ` and `Jᵀr` where `J` is the Jacobian of the model and `r = y - f`
fn normal_equations<M: Model>(
    model: &M,
    params: &Array1<f64>,
    x: &Array1<f64>,
    y: &Array1<f64>,
) -> (Array2<f64>, Array1<f64>) {
    let n = M::PARAMETERS;
    let p = params.as_slice().unwrap_or(&[]);
    let mut jtj = Array2::zeros((n, n));
    let mut jtr = Array1::zeros(n);
    let mut row = vec![0.0; n];

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        model.gradient(xi, p, &mut row);
        let r = yi - model.evaluate(xi, p);

        for (i, &gi) in row.iter().enumerate() {
            jtr[i] += gi * r;
            for (j, &gj) in row.iter().enumerate() {
                jtj[[i, j]] += gi * gj;
            }
        }
    }

    (jtj, jtr)
}

fn damped(jtj: &Array2<f64>, lambda: f64) -> Array2<f64> {
    let mut system = jtj.clone();
    for (i, &diagonal) in jtj.diag().iter().enumerate() {
        system[[i, i]] += lambda * diagonal.max(DIAGONAL_FLOOR);
    }
    system
}

fn step_is_negligible(step: &Array1<f64>, params: &Array1<f64>, tolerance: f64) -> bool {
    step.iter()
        .zip(params.iter())
        .all(|(d, p)| d.abs() < tolerance * (p.abs() + tolerance))
}

fn infinity_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

/// [`curve_fit`] for a model chosen at runtime
///
/// # Errors
///
/// Same as [`curve_fit`]
pub fn curve_fit_kind(
    kind: ModelKind,
    initial: &[f64],
    x: &Array1<f64>,
    y: &Array1<f64>,
    options: &FitOptions,
) -> Result<FitReport> {
    match kind {
        ModelKind::Gaussian => curve_fit(&Gaussian, initial, x, y, options),
        ModelKind::Sro => curve_fit(&SroCorrection, initial, x, y, options),
    }
}
