//! MACD line and signal line.
//!
//! MACD = EWMA(close, fast) - EWMA(close, slow); signal = EWMA(MACD, signal).
//! All three averages are unadjusted EWMAs, so both outputs are defined from
//! the first bar.

use super::ema::ewma_of_series;
use super::Indicator;

/// Which MACD output an instance produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    output: MacdLine,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires 1 <= fast < slow");
        Self {
            fast,
            slow,
            signal: 0,
            output: MacdLine::Line,
            name: format!("macd_{fast}_{slow}"),
        }
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires 1 <= fast < slow");
        assert!(signal >= 1, "MACD signal span must be >= 1");
        Self {
            fast,
            slow,
            signal,
            output: MacdLine::Signal,
            name: format!("macd_signal_{fast}_{slow}_{signal}"),
        }
    }

    pub fn output(&self) -> MacdLine {
        self.output
    }

    fn macd_line(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ewma_of_series(closes, self.fast);
        let slow = ewma_of_series(closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let line = self.macd_line(closes);
        match self.output {
            MacdLine::Line => line,
            MacdLine::Signal => ewma_of_series(&line, self.signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn flat_series_is_zero() {
        let closes = [50.0; 40];
        for v in Macd::line(12, 26).compute(&closes) {
            assert_approx(v, 0.0, DEFAULT_EPSILON);
        }
        for v in Macd::signal(12, 26, 9).compute(&closes) {
            assert_approx(v, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn single_step_hand_computed() {
        // After one jump of 5 from a flat base:
        // fast = 10 + 5 * 2/13, slow = 10 + 5 * 2/27
        let closes = [10.0, 10.0, 15.0];
        let line = Macd::line(12, 26).compute(&closes);
        let expected = 5.0 * (2.0 / 13.0) - 5.0 * (2.0 / 27.0);
        assert_approx(line[0], 0.0, DEFAULT_EPSILON);
        assert_approx(line[2], expected, 1e-12);

        // signal = 0 + line[2] * 2/10
        let signal = Macd::signal(12, 26, 9).compute(&closes);
        assert_approx(signal[2], expected * 0.2, 1e-12);
    }

    #[test]
    fn rising_series_has_positive_macd() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let line = Macd::line(12, 26).compute(&closes);
        let signal = Macd::signal(12, 26, 9).compute(&closes);
        assert!(line[39] > 0.0);
        // Signal lags the line on a steady trend.
        assert!(signal[39] < line[39]);
    }

    #[test]
    fn names() {
        assert_eq!(Macd::line(12, 26).name(), "macd_12_26");
        assert_eq!(Macd::signal(12, 26, 9).name(), "macd_signal_12_26_9");
        assert_eq!(Macd::signal(12, 26, 9).output(), MacdLine::Signal);
    }
}
