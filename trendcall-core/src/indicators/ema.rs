//! Exponentially weighted moving average without bias adjustment.
//!
//! `y[0] = x[0]`, `y[t] = alpha * x[t] + (1 - alpha) * y[t-1]` with
//! `alpha = 2 / (span + 1)`. Defined from the first bar, so lookback is 0.
//! This differs from the SMA-seeded EMA common in charting packages; MACD
//! values here follow the unadjusted recursion.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ewma {
    span: usize,
    name: String,
}

impl Ewma {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EWMA span must be >= 1");
        Self {
            span,
            name: format!("ewma_{span}"),
        }
    }

    pub fn alpha(&self) -> f64 {
        alpha(self.span)
    }
}

impl Indicator for Ewma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        ewma_of_series(closes, self.span)
    }
}

fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Unadjusted EWMA of an arbitrary series.
///
/// A NaN input yields NaN at that position and the recursion re-seeds from
/// the next finite value.
pub fn ewma_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if span == 0 {
        return result;
    }

    let alpha = alpha(span);
    let mut prev: Option<f64> = None;
    for (out, &v) in result.iter_mut().zip(values) {
        if v.is_nan() {
            prev = None;
            continue;
        }
        let next = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => v,
        };
        *out = next;
        prev = Some(next);
    }

    result
}
