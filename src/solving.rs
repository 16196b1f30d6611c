//! Fixed-point solver configuration and diagnostics.

use serde::{Deserialize, Serialize};

/// Configuration for the fixed-point iteration that recovers the mutation rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Maximum number of iterations allowed before aborting.
    pub max_iterations: usize,
    /// The starting guess is `f / initial_divisor`.
    pub initial_divisor: f64,
    /// The per-sample threshold is `min(f, N) / threshold_divisor`.
    pub threshold_divisor: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            initial_divisor: 5.0,
            threshold_divisor: 1_000_000.0,
        }
    }
}

impl SolverOptions {
    /// Set the iteration cap; at least one iteration is always allowed.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_initial_divisor(mut self, divisor: f64) -> Self {
        self.initial_divisor = divisor;
        self
    }

    pub fn with_threshold_divisor(mut self, divisor: f64) -> Self {
        self.threshold_divisor = divisor;
        self
    }

    /// Empirical starting point for the iteration.
    pub fn initial_guess(&self, frequency: f64) -> f64 {
        frequency / self.initial_divisor
    }

    /// Convergence tolerance scaled to the magnitude of the sample.
    pub fn threshold(&self, frequency: f64, population: f64) -> f64 {
        frequency.min(population) / self.threshold_divisor
    }
}

/// Diagnostics returned alongside the converged rate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolveSummary {
    /// Number of iterations performed.
    pub iterations: usize,
    /// Absolute change observed in the final iteration.
    pub last_diff: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn threshold_scales_with_smaller_input() {
        let options = SolverOptions::default();
        assert_relative_eq!(options.threshold(10.0, 1_000_000.0), 1e-5);
        assert_relative_eq!(options.threshold(2e-6, 1e8), 2e-12);
        assert_relative_eq!(options.initial_guess(10.0), 2.0);
    }

    #[test]
    fn iteration_cap_is_never_zero() {
        let options = SolverOptions::default().with_max_iterations(0);
        assert_eq!(options.max_iterations, 1);
    }

    #[test]
    fn partial_options_fill_in_defaults() {
        let options: SolverOptions = serde_json::from_str(r#"{"max_iterations": 50}"#).unwrap();
        assert_eq!(options.max_iterations, 50);
        assert_eq!(options.initial_divisor, 5.0);
        assert_eq!(options.threshold_divisor, 1_000_000.0);
    }
}
