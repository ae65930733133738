//! TradeRecord: one recommendation per ticker per run.
//!
//! Records are created once by the decision composer and never mutated.
//! Field names serialize to the export column names (`entryPrice`, `RSI`, …).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::prediction::Prediction;

/// Export column names, in order.
pub const RECORD_COLUMNS: [&str; 11] = [
    "date",
    "ticker",
    "entryPrice",
    "stopPrice",
    "targetPrice",
    "predictedDirection",
    "RSI",
    "MACD",
    "strategyNote",
    "actionLabel",
    "tradeStatus",
];

/// Rationale text: whether the technical setup held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyNote {
    #[serde(rename = "golden cross + RSI<60")]
    GoldenCrossRsiBelow60,
    #[serde(rename = "criteria not met")]
    CriteriaNotMet,
}

impl StrategyNote {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyNote::GoldenCrossRsiBelow60 => "golden cross + RSI<60",
            StrategyNote::CriteriaNotMet => "criteria not met",
        }
    }
}

impl fmt::Display for StrategyNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionLabel {
    #[serde(rename = "worth entering")]
    WorthEntering,
    #[serde(rename = "recommend waiting")]
    RecommendWaiting,
}

impl ActionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionLabel::WorthEntering => "worth entering",
            ActionLabel::RecommendWaiting => "recommend waiting",
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Tracking state. This tool only ever creates records awaiting entry;
/// later transitions belong to whoever tracks the trade by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    #[serde(rename = "awaiting entry")]
    AwaitingEntry,
}

impl TradeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeStatus::AwaitingEntry => "awaiting entry",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub(crate) date: NaiveDate,
    pub(crate) ticker: String,
    pub(crate) entry_price: f64,
    pub(crate) stop_price: f64,
    pub(crate) target_price: f64,
    pub(crate) predicted_direction: Prediction,
    #[serde(rename = "RSI")]
    pub(crate) rsi: f64,
    #[serde(rename = "MACD")]
    pub(crate) macd: f64,
    pub(crate) strategy_note: StrategyNote,
    pub(crate) action_label: ActionLabel,
    pub(crate) trade_status: TradeStatus,
}

impl TradeRecord {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn stop_price(&self) -> f64 {
        self.stop_price
    }

    pub fn target_price(&self) -> f64 {
        self.target_price
    }

    pub fn predicted_direction(&self) -> Prediction {
        self.predicted_direction
    }

    pub fn rsi(&self) -> f64 {
        self.rsi
    }

    pub fn macd(&self) -> f64 {
        self.macd
    }

    pub fn strategy_note(&self) -> StrategyNote {
        self.strategy_note
    }

    pub fn action_label(&self) -> ActionLabel {
        self.action_label
    }

    pub fn trade_status(&self) -> TradeStatus {
        self.trade_status
    }

    pub fn is_actionable(&self) -> bool {
        self.action_label == ActionLabel::WorthEntering
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TradeRecord {
        TradeRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            ticker: "TSLA".into(),
            entry_price: 15.0,
            stop_price: 14.25,
            target_price: 15.75,
            predicted_direction: Prediction::Up,
            rsi: 55.12,
            macd: 0.34,
            strategy_note: StrategyNote::GoldenCrossRsiBelow60,
            action_label: ActionLabel::WorthEntering,
            trade_status: TradeStatus::AwaitingEntry,
        }
    }

    #[test]
    fn json_uses_export_column_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        let mut expected = RECORD_COLUMNS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(obj["strategyNote"], "golden cross + RSI<60");
        assert_eq!(obj["actionLabel"], "worth entering");
        assert_eq!(obj["tradeStatus"], "awaiting entry");
        assert_eq!(obj["predictedDirection"], "up");
        assert_eq!(obj["date"], "2024-06-03");
    }

    #[test]
    fn json_roundtrip() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let back: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.is_actionable());
    }
}
