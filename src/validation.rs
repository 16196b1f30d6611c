//! Input guards applied to every sample before it reaches the solver.

use log::warn;
use thiserror::Error;

use crate::data::Sample;

/// Row-local validation failures. The display strings double as the output
/// annotation for the row.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("n must be positive")]
    InvalidN,
    #[error("f must be positive")]
    InvalidF,
}

// NaN compares false, so it is rejected along with zero and negatives.
fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// Checks that both inputs are strictly positive.
///
/// `N` is checked before `f`, and a failing `f` overrides a failing `N`.
pub fn validate(frequency: f64, population: f64) -> Result<(), ValidationError> {
    let mut outcome = Ok(());
    if !is_positive(population) {
        outcome = Err(ValidationError::InvalidN);
    }
    if !is_positive(frequency) {
        outcome = Err(ValidationError::InvalidF);
    }
    outcome
}

/// Validates a sample, logging one warning per failing condition.
pub fn validate_sample(sample: &Sample) -> Result<(), ValidationError> {
    if !is_positive(sample.population) {
        warn!(
            "N must be positive. Please recheck your data for sample {}",
            sample.name
        );
    }
    if !is_positive(sample.frequency) {
        warn!(
            "f must be positive. Please recheck your data for sample {}",
            sample.name
        );
    }
    validate(sample.frequency, sample.population)
}
