//! Two-column data files and fit report output

use crate::fitting::curve::FitReport;
use crate::io::configuration::PARAMETER_PREFIX;
use crate::io::error::{FitError, Result, WithPath};
use ndarray::Array1;
use std::fmt::Write as _;
use std::path::Path;

/// Paired samples `(xᵢ, yᵢ)` of a curve
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Independent variable, e.g. temperature
    pub x: Array1<f64>,
    /// Dependent variable, e.g. free-energy correction
    pub y: Array1<f64>,
}

impl Dataset {
    /// Pair up `x` and `y`
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` differ in length
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FitError::DimensionMismatch {
                context: "dataset columns",
                expected: x.len(),
                found: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Load a data file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_path(path, "read data file")?;
        Self::parse(path, &contents)
    }

    /// Parse two numeric columns separated by whitespace or commas
    ///
    /// Blank lines and lines starting with `#` are skipped. `source` is only
    /// used to label parse errors.
    ///
    /// # Errors
    ///
    /// Returns an error if a line does not hold exactly two numbers
    pub fn parse(source: &Path, contents: &str) -> Result<Self> {
        let mut x = Vec::new();
        let mut y = Vec::new();

        for (index, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parse_error = |reason: String| FitError::Parse {
                path: source.to_path_buf(),
                line: index + 1,
                reason,
            };

            let fields: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|field| !field.is_empty())
                .collect();

            let [xs, ys] = fields.as_slice() else {
                return Err(parse_error(format!(
                    "expected 2 columns, found {}",
                    fields.len()
                )));
            };

            let xi = xs
                .parse::<f64>()
                .map_err(|e| parse_error(format!("'{xs}': {e}")))?;
            let yi = ys
                .parse::<f64>()
                .map_err(|e| parse_error(format!("'{ys}': {e}")))?;

            x.push(xi);
            y.push(yi);
        }

        Self::new(Array1::from(x), Array1::from(y))
    }

    /// Render as `x y` lines
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (xi, yi) in self.x.iter().zip(self.y.iter()) {
            let _ = writeln!(out, "{xi} {yi}");
        }
        out
    }

    /// Write as `x y` lines, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written
    pub fn write(&self, path: &Path) -> Result<()> {
        write_text(path, &self.to_text())
    }
}

/// Render a fit report as comment headers followed by one line per parameter
pub fn format_report(report: &FitReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# model {}", report.model);
    let _ = writeln!(out, "# rss {}", report.residual_sum_of_squares);
    let _ = writeln!(out, "# iterations {}", report.iterations);
    let _ = writeln!(out, "# termination {}", report.termination);
    for (i, value) in report.params.iter().enumerate() {
        let _ = writeln!(out, "{PARAMETER_PREFIX}{i} {value}");
    }
    out
}

/// Write a fit report to `path`
///
/// # Errors
///
/// Returns an error if the file or its parent directory cannot be written
pub fn write_report(report: &FitReport, path: &Path) -> Result<()> {
    write_text(path, &format_report(report))
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }
    std::fs::write(path, contents).with_path(path, "write")
}
