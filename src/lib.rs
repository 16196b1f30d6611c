//! Mutation rate estimation from mutant frequency and population size.
//!
//! Given the observed mutant frequency `f` and the population size `N` of a
//! sample, the per-replication mutation rate `u` is the solution of
//!
//! ```text
//! u = f / ln(N u)
//! ```
//!
//! as used by Drake, "A constant rate of spontaneous mutation in DNA-based
//! microbes" (PNAS 88, 1991). The crate offers tools to
//!
//! - load and check `name,f,N` sample tables (`data` module),
//! - guard samples against non-positive inputs (`validation` module),
//! - solve the fixed-point relation (`rate` and `solving` modules),
//! - run a whole table row by row (`estimation` module), and
//! - write the augmented `name,f,N,u` table (`output` module).
//!
//! # Quick start
//!
//! ```no_run
//! use mutrate::data::Sample;
//! use mutrate::{EstimationOptions, RateEstimator};
//!
//! let estimator = RateEstimator::new(EstimationOptions::default());
//! let estimate = estimator
//!     .estimate(&Sample::new("wild type", 2e-6, 1e8))
//!     .expect("converged");
//! println!("u = {:e} after {} iterations", estimate.rate, estimate.summary.iterations);
//! ```

pub mod data;
pub mod error;
pub mod estimation;
pub mod output;
pub mod rate;
pub mod solving;
pub mod validation;

pub use error::{MutationRateError, Result};
pub use estimation::{
    EstimationOptions, FileReport, RateEstimate, RateEstimator, RowOutcome, RowResult, RunSummary,
};
pub use solving::{SolveSummary, SolverOptions};
pub use validation::{validate, ValidationError};
