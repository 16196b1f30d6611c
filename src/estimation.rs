//! Per-row estimation pipeline: field check, validation, then the solver.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::data::{Record, Sample, SampleTable};
use crate::error::Result;
use crate::output::{output_path, write_results_to_path};
use crate::rate::solve_rate;
use crate::solving::{SolveSummary, SolverOptions};
use crate::validation::{validate_sample, ValidationError};

/// A converged mutation-rate estimate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateEstimate {
    /// Mutation rate per replication (`u`).
    pub rate: f64,
    /// Convergence threshold derived from the sample.
    pub threshold: f64,
    /// Diagnostics from the fixed-point iteration.
    pub summary: SolveSummary,
}

/// What happened to a single row of the input table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RowOutcome {
    Converged(RateEstimate),
    /// Fewer than three fields.
    MissingInput,
    InvalidN,
    InvalidF,
    /// The solver hit its iteration cap or a non-finite value.
    DidNotConverge,
}

impl RowOutcome {
    pub fn rate(&self) -> Option<f64> {
        match self {
            Self::Converged(estimate) => Some(estimate.rate),
            _ => None,
        }
    }
}

impl From<ValidationError> for RowOutcome {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::InvalidN => Self::InvalidN,
            ValidationError::InvalidF => Self::InvalidF,
        }
    }
}

/// Renders the `u` column; converged rates use [`crate::output::format_rate`].
impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged(estimate) => f.write_str(&crate::output::format_rate(estimate.rate)),
            Self::MissingInput => f.write_str("missing input"),
            Self::InvalidN => write!(f, "{}", ValidationError::InvalidN),
            Self::InvalidF => write!(f, "{}", ValidationError::InvalidF),
            Self::DidNotConverge => f.write_str("did not converge"),
        }
    }
}

/// The outcome of a row together with the input fields it echoes.
#[derive(Clone, Debug, PartialEq)]
pub struct RowResult {
    /// Leading `name`, `f`, `N` fields exactly as read.
    pub fields: Vec<String>,
    pub outcome: RowOutcome,
}

/// Outcome counts for a whole table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub converged: usize,
    pub missing_input: usize,
    pub invalid_n: usize,
    pub invalid_f: usize,
    pub did_not_converge: usize,
}

impl RunSummary {
    pub fn from_results(results: &[RowResult]) -> Self {
        let mut summary = Self {
            rows: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.outcome {
                RowOutcome::Converged(_) => summary.converged += 1,
                RowOutcome::MissingInput => summary.missing_input += 1,
                RowOutcome::InvalidN => summary.invalid_n += 1,
                RowOutcome::InvalidF => summary.invalid_f += 1,
                RowOutcome::DidNotConverge => summary.did_not_converge += 1,
            }
        }
        summary
    }
}

/// Configuration knobs for a table run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationOptions {
    /// Options for the fixed-point solver.
    pub solver: SolverOptions,
}

impl EstimationOptions {
    /// Overrides the solver options.
    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }
}

/// Estimates mutation rates for samples and tables.
#[derive(Clone, Debug, Default)]
pub struct RateEstimator {
    options: EstimationOptions,
}

impl RateEstimator {
    pub fn new(options: EstimationOptions) -> Self {
        Self { options }
    }

    /// Solves a single sample, starting from `f / 5` with threshold `min(f, N) / 1e6`.
    pub fn estimate(&self, sample: &Sample) -> Result<RateEstimate> {
        let solver = &self.options.solver;
        let threshold = solver.threshold(sample.frequency, sample.population);
        let initial = solver.initial_guess(sample.frequency);
        let (rate, summary) = solve_rate(
            sample.population,
            sample.frequency,
            initial,
            threshold,
            solver,
        )?;
        debug!(
            "sample {}: u = {rate:e} after {} iterations",
            sample.name, summary.iterations
        );
        Ok(RateEstimate {
            rate,
            threshold,
            summary,
        })
    }

    /// Validates and, if valid, solves one sample.
    pub fn evaluate(&self, sample: &Sample) -> RowOutcome {
        if let Err(error) = validate_sample(sample) {
            return error.into();
        }
        match self.estimate(sample) {
            Ok(estimate) => RowOutcome::Converged(estimate),
            Err(error) => {
                warn!("sample {}: {error}", sample.name);
                RowOutcome::DidNotConverge
            }
        }
    }

    /// Processes one raw row. Only unparseable numbers are fatal.
    pub fn evaluate_record(&self, record: &Record) -> Result<RowResult> {
        let fields = record.leading_fields().to_vec();
        let outcome = match record.to_sample()? {
            Some(sample) => self.evaluate(&sample),
            None => {
                warn!(
                    "the row\n{}\ndoes not contain the 3 required inputs",
                    record.fields().join(",")
                );
                RowOutcome::MissingInput
            }
        };
        Ok(RowResult { fields, outcome })
    }

    /// Processes every row of a table in order.
    pub fn evaluate_table(&self, table: &SampleTable) -> Result<Vec<RowResult>> {
        let results = table
            .records()
            .iter()
            .map(|record| self.evaluate_record(record))
            .collect::<Result<Vec<_>>>()?;
        let summary = RunSummary::from_results(&results);
        info!(
            "processed {} rows: {} converged, {} missing input, {} invalid N, {} invalid f, {} did not converge",
            summary.rows,
            summary.converged,
            summary.missing_input,
            summary.invalid_n,
            summary.invalid_f,
            summary.did_not_converge
        );
        Ok(results)
    }

    /// Loads `input`, estimates every row and writes the augmented table.
    ///
    /// The output goes to `output`, or next to the input following
    /// [`output_path`]. Nothing is written if loading or parsing fails.
    pub fn process_file(&self, input: &Path, output: Option<&Path>) -> Result<FileReport> {
        let table = SampleTable::from_path(input)?;
        let results = self.evaluate_table(&table)?;
        let output = output.map_or_else(|| output_path(input), Path::to_path_buf);
        write_results_to_path(&output, &results)?;
        Ok(FileReport {
            output,
            summary: RunSummary::from_results(&results),
        })
    }
}

/// Where a processed table was written and what it contained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub output: PathBuf,
    pub summary: RunSummary,
}
