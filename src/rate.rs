//! Mutation-rate primitives: the safety-guarded fixed-point iteration on
//! `u = f / ln(N u)` from Drake's constant-rate model.

use log::trace;

use crate::error::{MutationRateError, Result};
use crate::solving::{SolveSummary, SolverOptions};

/// Moves `rate` away from the points where `ln(N u)` is undefined or zero.
///
/// The three patches run in a fixed order: a zero rate is replaced by the
/// threshold, a product of exactly one is nudged by the threshold, and a
/// negative product has the sign of the rate flipped.
pub(crate) fn guard_log_argument(population: f64, rate: f64, threshold: f64) -> f64 {
    let mut rate = rate;
    if rate == 0.0 {
        rate = threshold;
    }
    if population * rate == 1.0 {
        rate += threshold;
    }
    if population * rate < 0.0 {
        rate = -rate;
    }
    rate
}

/// Solves `u = f / ln(N u)` for the mutation rate `u` by fixed-point iteration.
///
/// Iterates from `initial` until two consecutive estimates differ by at most
/// `threshold`. The body always runs at least once, so the returned value is
/// never the untouched starting guess.
pub fn solve_rate(
    population: f64,
    frequency: f64,
    initial: f64,
    threshold: f64,
    options: &SolverOptions,
) -> Result<(f64, SolveSummary)> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(MutationRateError::InvalidThreshold { threshold });
    }

    let max_iterations = options.max_iterations.max(1);
    let mut rate = initial;
    let mut last_diff = f64::INFINITY;
    let mut iteration = 0usize;

    while iteration < max_iterations {
        rate = guard_log_argument(population, rate, threshold);

        let guess = frequency / (population * rate).ln();
        if guess.is_nan() {
            return Err(MutationRateError::NumericalError {
                context: "rate iteration",
            });
        }
        last_diff = (rate - guess).abs();
        rate = guess;
        iteration += 1;
        trace!("iteration {iteration}: u = {rate:e}, step = {last_diff:e}");

        if last_diff <= threshold {
            return Ok((
                rate,
                SolveSummary {
                    iterations: iteration,
                    last_diff,
                },
            ));
        }
    }

    Err(MutationRateError::DidNotConverge {
        iterations: iteration,
        last_diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn residual(population: f64, frequency: f64, rate: f64) -> f64 {
        (rate - frequency / (population * rate).ln()).abs()
    }

    #[test]
    fn zero_rate_is_replaced_by_threshold() {
        assert_eq!(guard_log_argument(10.0, 0.0, 1e-3), 1e-3);
    }

    #[test]
    fn unit_product_is_nudged() {
        assert_eq!(guard_log_argument(4.0, 0.25, 1e-3), 0.25 + 1e-3);
    }

    #[test]
    fn negative_product_flips_sign() {
        assert_eq!(guard_log_argument(100.0, -0.5, 1e-3), 0.5);
    }

    #[test]
    fn guards_apply_in_order() {
        // 0 -> 0.25 (threshold), then 4 * 0.25 == 1 -> 0.5.
        assert_eq!(guard_log_argument(4.0, 0.0, 0.25), 0.5);
    }

    #[test]
    fn converges_to_fixed_point() {
        let options = SolverOptions::default();
        let threshold = options.threshold(10.0, 1_000_000.0);
        let (rate, summary) = solve_rate(1_000_000.0, 10.0, 2.0, threshold, &options).unwrap();

        assert!(summary.iterations > 1);
        assert!(summary.last_diff <= threshold);
        assert!(residual(1_000_000.0, 10.0, rate) <= threshold);
        assert_relative_eq!(rate, 0.7397, epsilon = 1e-3);
    }

    #[test]
    fn realistic_frequency_converges() {
        let options = SolverOptions::default();
        let (population, frequency) = (1e8, 2e-6);
        let threshold = options.threshold(frequency, population);
        let (rate, _) = solve_rate(
            population,
            frequency,
            options.initial_guess(frequency),
            threshold,
            &options,
        )
        .unwrap();

        assert!(rate > 0.0);
        assert!(residual(population, frequency, rate) <= threshold);
    }

    #[test]
    fn runs_at_least_one_iteration() {
        let options = SolverOptions::default();
        let (rate, summary) = solve_rate(1_000_000.0, 10.0, 2.0, 100.0, &options).unwrap();

        assert_eq!(summary.iterations, 1);
        assert_relative_eq!(rate, 10.0 / 2_000_000f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let options = SolverOptions::default().with_max_iterations(2);
        let result = solve_rate(1_000_000.0, 10.0, 2.0, 1e-12, &options);

        assert!(matches!(
            result,
            Err(MutationRateError::DidNotConverge { iterations: 2, .. })
        ));
    }

    #[test]
    fn zero_cap_from_config_still_iterates() {
        let options: SolverOptions = serde_json::from_str(r#"{"max_iterations": 0}"#).unwrap();
        assert_eq!(options.max_iterations, 0);

        let (rate, summary) = solve_rate(1_000_000.0, 10.0, 2.0, 100.0, &options).unwrap();
        assert_eq!(summary.iterations, 1);
        assert_relative_eq!(rate, 10.0 / 2_000_000f64.ln(), epsilon = 1e-12);

        let capped = solve_rate(1_000_000.0, 10.0, 2.0, 1e-5, &options);
        assert!(matches!(
            capped,
            Err(MutationRateError::DidNotConverge { iterations: 1, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let options = SolverOptions::default();
        for threshold in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                solve_rate(100.0, 1.0, 0.2, threshold, &options),
                Err(MutationRateError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn nan_input_is_a_numerical_error() {
        let options = SolverOptions::default();
        assert!(matches!(
            solve_rate(100.0, f64::NAN, 0.2, 1e-6, &options),
            Err(MutationRateError::NumericalError { .. })
        ));
    }
}
