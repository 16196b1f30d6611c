use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for `mutrate` operations.
#[derive(Debug, Error)]
pub enum MutationRateError {
    /// Raised when the input table does not exist.
    #[error(
        "input file `{}` not found; put your data into a file named input.csv \
         or pass its path as an argument",
        .path.display()
    )]
    FileNotFound { path: PathBuf },

    /// Raised when the header row does not start with `name,f,N`.
    #[error("the column headings must be name, f, N (found `{found}`)")]
    BadHeader {
        /// The header row as it was read.
        found: String,
    },

    /// Raised when `f` or `N` cannot be read as a number.
    #[error("line {line}: column `{column}` value `{value}` is not a number")]
    InvalidNumber {
        /// 1-based line number in the input table.
        line: u64,
        /// Header name of the offending column.
        column: &'static str,
        /// Raw text of the field.
        value: String,
    },

    /// Raised when the convergence threshold is not a positive finite number.
    #[error("convergence threshold must be positive and finite, found {threshold}")]
    InvalidThreshold { threshold: f64 },

    /// Raised when the fixed-point iteration exhausts its iteration budget.
    #[error("rate iteration did not converge after {iterations} iterations; last step {last_diff}")]
    DidNotConverge {
        /// Number of iterations performed before termination.
        iterations: usize,
        /// Absolute change observed in the last iteration.
        last_diff: f64,
    },

    /// Raised when numerical routines produce NaN or infinity.
    #[error("encountered a non-finite value during {context}")]
    NumericalError { context: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MutationRateError {
    /// Helper to format an [`InvalidNumber`](MutationRateError::InvalidNumber) error.
    pub fn invalid_number(line: u64, column: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            line,
            column,
            value: value.into(),
        }
    }

    /// Helper for header mismatches.
    pub fn bad_header(found: impl Into<String>) -> Self {
        Self::BadHeader {
            found: found.into(),
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, MutationRateError>;
