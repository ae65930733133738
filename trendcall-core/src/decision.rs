//! Decision composer: latest/prior feature rows + prediction → TradeRecord.
//!
//! Pure. The run date is supplied by the caller; nothing here reads the clock.

use chrono::NaiveDate;

use crate::domain::{
    ActionLabel, FeatureRow, Prediction, StrategyNote, TradeRecord, TradeStatus,
};

/// Stop-loss as a fraction of entry.
pub const STOP_FACTOR: f64 = 0.95;
/// Take-profit as a fraction of entry.
pub const TARGET_FACTOR: f64 = 1.05;
/// RSI must be strictly below this for the setup to qualify.
pub const RSI_CEILING: f64 = 60.0;

/// Round to two decimals.
///
/// Rounds the exact binary value, so `10.5 * 0.95` (stored as 9.97499...)
/// gives 9.97. Exact binary ties go to even, e.g. 0.125 → 0.12.
pub fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

/// SMA10 crossed above SMA20 on the latest bar.
pub fn golden_cross(latest: &FeatureRow, prior: &FeatureRow) -> bool {
    latest.sma10 > latest.sma20 && prior.sma10 <= prior.sma20
}

/// Rule-overlay inputs, evaluated once per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySetup {
    pub golden_cross: bool,
    pub rsi_below_ceiling: bool,
}

impl EntrySetup {
    pub fn evaluate(latest: &FeatureRow, prior: &FeatureRow) -> Self {
        Self {
            golden_cross: golden_cross(latest, prior),
            rsi_below_ceiling: latest.rsi < RSI_CEILING,
        }
    }

    pub fn qualifies(&self) -> bool {
        self.golden_cross && self.rsi_below_ceiling
    }
}

/// Entry, stop and target prices derived from a close.
pub fn price_levels(close: f64) -> (f64, f64, f64) {
    let entry = round2(close);
    (
        entry,
        round2(entry * STOP_FACTOR),
        round2(entry * TARGET_FACTOR),
    )
}

pub fn compose(
    ticker: &str,
    run_date: NaiveDate,
    latest: &FeatureRow,
    prior: &FeatureRow,
    prediction: Prediction,
) -> TradeRecord {
    let (entry_price, stop_price, target_price) = price_levels(latest.close);
    let setup = EntrySetup::evaluate(latest, prior);
    let qualifies = setup.qualifies();

    let strategy_note = if qualifies {
        StrategyNote::GoldenCrossRsiBelow60
    } else {
        StrategyNote::CriteriaNotMet
    };
    let action_label = if prediction.is_up() && qualifies {
        ActionLabel::WorthEntering
    } else {
        ActionLabel::RecommendWaiting
    };

    TradeRecord {
        date: run_date,
        ticker: ticker.to_string(),
        entry_price,
        stop_price,
        target_price,
        predicted_direction: prediction,
        rsi: round2(latest.rsi),
        macd: round2(latest.macd),
        strategy_note,
        action_label,
        trade_status: TradeStatus::AwaitingEntry,
    }
}
