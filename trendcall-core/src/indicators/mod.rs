//! Indicator implementations over a close-price column.
//!
//! Every indicator is a pure function of the closes: one value per input
//! bar, `f64::NAN` where the indicator is not yet defined. Values at bar `t`
//! never depend on bars after `t`.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ewma_of_series, Ewma};
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use sma::Sma;

/// Trait for indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as its input. The first
/// `lookback()` values are `f64::NAN` (warmup).
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire close series.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_indicators() -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(10)),
            Box::new(Sma::new(20)),
            Box::new(Rsi::new(14)),
            Box::new(Ewma::new(12)),
            Box::new(Macd::line(12, 26)),
            Box::new(Macd::signal(12, 26, 9)),
        ]
    }

    fn wavy_closes(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 8.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn no_lookahead_truncated_matches_full() {
        let full = wavy_closes(60);
        for ind in all_indicators() {
            let full_values = ind.compute(&full);
            for cut in [21, 30, 45] {
                let truncated = ind.compute(&full[..cut]);
                for i in 0..cut {
                    let (a, b) = (truncated[i], full_values[i]);
                    assert!(
                        (a.is_nan() && b.is_nan()) || (a - b).abs() < DEFAULT_EPSILON,
                        "{} differs at bar {i} with cut {cut}: {a} vs {b}",
                        ind.name()
                    );
                }
            }
        }
    }

    #[test]
    fn warmup_is_nan_then_defined() {
        let closes = wavy_closes(40);
        for ind in all_indicators() {
            let values = ind.compute(&closes);
            assert_eq!(values.len(), closes.len());
            for (i, v) in values.iter().enumerate() {
                if i < ind.lookback() {
                    assert!(v.is_nan(), "{} should be NaN at {i}", ind.name());
                } else {
                    assert!(v.is_finite(), "{} should be defined at {i}", ind.name());
                }
            }
        }
    }
}
