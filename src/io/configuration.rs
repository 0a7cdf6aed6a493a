//! Fitting constants and runtime configuration defaults

// Levenberg-Marquardt stopping criteria
/// Default iteration cap for a single fit
pub const DEFAULT_MAX_ITERATIONS: usize = 200;
/// Relative step size below which the fit is considered converged
pub const DEFAULT_X_TOLERANCE: f64 = 1e-8;
/// Infinity norm of the scaled gradient below which the fit is converged
pub const DEFAULT_GRADIENT_TOLERANCE: f64 = 1e-8;
/// Starting damping factor
pub const DEFAULT_INITIAL_DAMPING: f64 = 1e-3;

/// Factor applied to the damping after a rejected or accepted step
pub const DAMPING_FACTOR: f64 = 10.0;
// Past this the step is effectively zero; the fit cannot move any further
/// Upper bound on the damping factor
pub const MAX_DAMPING: f64 = 1e16;
/// Lower bound on the damping factor
pub const MIN_DAMPING: f64 = 1e-16;
// Keeps the damped system solvable when a parameter has no influence on the residuals
/// Smallest diagonal entry used when scaling the damping term
pub const DIAGONAL_FLOOR: f64 = 1e-12;

/// Pivots with smaller magnitude are treated as zero
pub const SINGULAR_PIVOT: f64 = 1e-300;

// Initial guesses used when the caller supplies none
/// Gaussian amplitude, center, width
pub const GAUSSIAN_INITIAL_GUESS: [f64; 3] = [1.0, 0.0, 1.0];
/// SRO coefficients a0, a1, a2
pub const SRO_INITIAL_GUESS: [f64; 3] = [1.0, 1.0, 1.0];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Default values for configurable parameters
/// Fixed seed for reproducible synthetic data
pub const DEFAULT_SEED: u64 = 42;
/// Default number of grid points for evaluation and sampling
pub const DEFAULT_POINTS: usize = 50;

// Output settings
/// Suffix added to fit report filenames
pub const OUTPUT_SUFFIX: &str = "_fit";
/// Extension of fit report files
pub const OUTPUT_EXTENSION: &str = "txt";
/// Data file extensions picked up when fitting a directory
pub const DATA_EXTENSIONS: [&str; 3] = ["dat", "csv", "txt"];
/// Parameter labels in fit reports are this prefix followed by the index
pub const PARAMETER_PREFIX: &str = "p";
