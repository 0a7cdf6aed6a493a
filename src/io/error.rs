//! Error types and context management for fitting and data operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all fitting and data operations
#[derive(Debug)]
pub enum FitError {
    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Two inputs that must agree in length or shape do not
    DimensionMismatch {
        /// What was being compared
        context: &'static str,
        /// Expected length
        expected: usize,
        /// Length actually provided
        found: usize,
    },

    /// Fewer data points than free parameters
    InsufficientData {
        /// Number of data points supplied
        points: usize,
        /// Minimum number of points required
        required: usize,
    },

    /// Linear system has no unique solution
    SingularMatrix {
        /// Column at which elimination found no usable pivot
        column: usize,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Data file contents could not be parsed
    Parse {
        /// File being parsed
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::DimensionMismatch {
                context,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {context}: expected {expected}, found {found}"
                )
            }
            Self::InsufficientData { points, required } => {
                write!(
                    f,
                    "Insufficient data: {points} points supplied, at least {required} required"
                )
            }
            Self::SingularMatrix { column } => {
                write!(f, "Singular matrix: no usable pivot in column {column}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::Parse { path, line, reason } => {
                write!(f, "Failed to parse '{}' line {line}: {reason}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for fitting results
pub type Result<T> = std::result::Result<T, FitError>;

/// Attaches a file path and operation to I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into [`FitError::FileSystem`] for `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T> {
        self.map_err(|source| FitError::FileSystem {
            path: path.into(),
            operation,
            source,
        })
    }
}

impl From<std::io::Error> for FitError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> FitError {
    FitError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> FitError {
    FitError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an error for a bad CLI target path
pub fn io_error(msg: &str) -> FitError {
    FitError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
