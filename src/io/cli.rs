//! Command-line interface for evaluating, sampling and batch fitting the models

use crate::fitting::curve::{FitOptions, FitReport, curve_fit_kind};
use crate::io::configuration::{
    DATA_EXTENSIONS, DEFAULT_MAX_ITERATIONS, DEFAULT_POINTS, DEFAULT_SEED, OUTPUT_EXTENSION,
    OUTPUT_SUFFIX,
};
use crate::io::data::{Dataset, write_report};
use crate::io::error::{FitError, Result, WithPath, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::math::grid::linspace;
use crate::math::models::ModelKind;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "thermofit")]
#[command(
    author,
    version,
    about = "Evaluate and fit Gaussian and short-range-order correction models"
)]
/// Command-line arguments for the model tool
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Print `x f(x)` for a model on a grid or at explicit points
    Eval(EvalArgs),
    /// Fit a model to a data file or to every data file in a directory
    Fit(FitArgs),
    /// Write samples of a model, optionally with uniform noise
    Sample(SampleArgs),
}

/// Evenly spaced evaluation grid
#[derive(Args, Debug, Clone, Copy)]
pub struct GridArgs {
    /// First grid point
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub from: f64,

    /// Last grid point
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub to: f64,

    /// Number of grid points
    #[arg(short = 'n', long = "points", default_value_t = DEFAULT_POINTS)]
    pub count: usize,
}

impl GridArgs {
    /// Grid values
    pub fn values(&self) -> ndarray::Array1<f64> {
        linspace(self.from, self.to, self.count)
    }
}

/// Arguments of `thermofit eval`
#[derive(Args)]
pub struct EvalArgs {
    /// Model to evaluate
    #[arg(value_enum)]
    pub model: ModelKind,

    /// Model parameters, comma separated (`a,b,c` or `a0,a1,a2`)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        required = true,
        allow_negative_numbers = true
    )]
    pub params: Vec<f64>,

    /// Grid used when no explicit points are given
    #[command(flatten)]
    pub grid: GridArgs,

    /// Explicit evaluation points
    #[arg(value_name = "X", allow_negative_numbers = true)]
    pub xs: Vec<f64>,
}

impl EvalArgs {
    /// Evaluate the model at the requested points
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter count does not match the model
    pub fn evaluate(&self) -> Result<Dataset> {
        check_params(self.model, &self.params, "params")?;
        let x = if self.xs.is_empty() {
            self.grid.values()
        } else {
            ndarray::Array1::from(self.xs.clone())
        };
        let y = self.model.evaluate_array(&x, &self.params);
        Dataset::new(x, y)
    }
}

/// Arguments of `thermofit fit`
#[derive(Args)]
pub struct FitArgs {
    /// Data file or directory of data files to fit
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Model to fit
    #[arg(short, long, value_enum, default_value_t = ModelKind::Gaussian)]
    pub model: ModelKind,

    /// Initial parameters, comma separated; defaults depend on the model
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub initial: Vec<f64>,

    /// Maximum fitter iterations per file
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Fit files even if a report already exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl FitArgs {
    /// Check if existing reports should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Starting parameters for every fit
    ///
    /// # Errors
    ///
    /// Returns an error if explicit initial parameters do not match the model
    pub fn initial_params(&self) -> Result<Vec<f64>> {
        if self.initial.is_empty() {
            Ok(self.model.initial_guess().to_vec())
        } else {
            check_params(self.model, &self.initial, "initial")?;
            Ok(self.initial.clone())
        }
    }

    /// Fitter settings derived from the arguments
    pub fn options(&self) -> FitOptions {
        FitOptions {
            max_iterations: self.max_iterations,
            ..FitOptions::default()
        }
    }
}

/// Arguments of `thermofit sample`
#[derive(Args)]
pub struct SampleArgs {
    /// Model to sample
    #[arg(value_enum)]
    pub model: ModelKind,

    /// Model parameters, comma separated
    #[arg(
        short,
        long,
        value_delimiter = ',',
        required = true,
        allow_negative_numbers = true
    )]
    pub params: Vec<f64>,

    /// Sampling grid
    #[command(flatten)]
    pub grid: GridArgs,

    /// Half-width of the uniform noise added to each sample
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for reproducible noise
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output file; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SampleArgs {
    /// Sample the model on the grid, adding noise drawn from `[-noise, noise]`
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter count does not match the model or
    /// the noise level is negative or not finite
    pub fn dataset(&self) -> Result<Dataset> {
        check_params(self.model, &self.params, "params")?;
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(invalid_parameter(
                "noise",
                &self.noise,
                &"must be finite and non-negative",
            ));
        }

        let x = self.grid.values();
        let mut y = self.model.evaluate_array(&x, &self.params);
        if self.noise > 0.0 {
            let mut rng = StdRng::seed_from_u64(self.seed);
            y.mapv_inplace(|yi| yi + rng.random_range(-self.noise..=self.noise));
        }
        Dataset::new(x, y)
    }
}

fn check_params(model: ModelKind, params: &[f64], name: &'static str) -> Result<()> {
    if params.len() == model.parameters() {
        Ok(())
    } else {
        Err(invalid_parameter(
            name,
            &format!("{params:?}"),
            &format!(
                "{} takes {} parameters",
                model.name(),
                model.parameters()
            ),
        ))
    }
}

impl Cli {
    /// Execute the selected subcommand
    ///
    /// # Errors
    ///
    /// Returns an error if the subcommand fails
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Eval(args) => write_stdout(&args.evaluate()?.to_text()),
            Command::Sample(args) => {
                let dataset = args.dataset()?;
                match &args.output {
                    Some(path) => dataset.write(path),
                    None => write_stdout(&dataset.to_text()),
                }
            }
            Command::Fit(args) => FileProcessor::new(args).process().map(|_| ()),
        }
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())
        .with_path("<stdout>", "write")
}

/// Orchestrates batch fitting of data files with progress tracking
pub struct FileProcessor {
    args: FitArgs,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given fit arguments
    pub fn new(args: FitArgs) -> Self {
        let progress_manager = args.should_show_progress().then(ProgressManager::new);

        Self {
            args,
            progress_manager,
        }
    }

    /// Fit every selected file and write one report per file
    ///
    /// Returns the paths of the reports written.
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, loading, fitting or writing
    /// fails for any file
    pub fn process(&mut self) -> Result<Vec<PathBuf>> {
        let initial = self.args.initial_params()?;
        let options = self.args.options();
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut written = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            written.push(self.process_file(file, index, &initial, &options)?);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(written)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.args.target;
        if target.is_file() {
            if self.should_process_file(target) {
                Ok(vec![target.clone()])
            } else {
                Ok(vec![])
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).with_path(target, "read directory")? {
                let path = entry.with_path(target, "read directory")?.path();
                if is_data_file(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(crate::io::error::io_error(
                "Target must be a data file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.args.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.args.quiet {
                eprintln!("Skipping: {} (report exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for user feedback on fits that hit the iteration cap
    #[allow(clippy::print_stderr)]
    fn process_file(
        &mut self,
        input_path: &Path,
        index: usize,
        initial: &[f64],
        options: &FitOptions,
    ) -> Result<PathBuf> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let dataset = Dataset::from_path(input_path)?;
        let report = curve_fit_kind(self.args.model, initial, &dataset.x, &dataset.y, options)
            .map_err(|error| match error {
                FitError::InsufficientData { .. } | FitError::DimensionMismatch { .. } => {
                    FitError::InvalidParameter {
                        parameter: "target",
                        value: input_path.display().to_string(),
                        reason: error.to_string(),
                    }
                }
                other => other,
            })?;

        if !report.termination.converged() && !self.args.quiet {
            eprintln!(
                "Warning: {} did not converge within {} iterations",
                input_path.display(),
                report.iterations
            );
        }

        write_report(&report, &output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, &summary(&report), start_time.elapsed());
        }

        Ok(output_path)
    }

    /// Report path written for `input_path`: `<stem>_fit.txt` beside the input
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            OUTPUT_EXTENSION
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

// Reports share an extension with data files, so they are recognised by their suffix
fn is_data_file(path: &Path) -> bool {
    let has_data_extension = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| DATA_EXTENSIONS.contains(&ext));
    let is_report = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX));

    path.is_file() && has_data_extension && !is_report
}

fn summary(report: &FitReport) -> String {
    format!(
        "rss {:.3e}, {} iterations",
        report.residual_sum_of_squares, report.iterations
    )
}
