//! Relative Strength Index (RSI) with simple-mean smoothing.
//!
//! gain[t] = max(close[t] - close[t-1], 0), loss[t] = max(close[t-1] - close[t], 0),
//! with both taken as 0 on the first bar. Average gain and loss are plain
//! rolling means over `period` bars (not Wilder smoothing), so the first value
//! lands at index period-1.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 with avg_gain > 0 → 100; both zero → 50.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change.is_nan() {
                gains[i] = f64::NAN;
                losses[i] = f64::NAN;
            } else {
                gains[i] = change.max(0.0);
                losses[i] = (-change).max(0.0);
            }
        }

        for i in (self.period - 1)..n {
            let window = (i + 1 - self.period)..=i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / self.period as f64;
            let avg_loss = losses[window].iter().sum::<f64>() / self.period as f64;
            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        return f64::NAN;
    }
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
