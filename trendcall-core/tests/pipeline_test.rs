//! End-to-end scoring tests: close series in, TradeRecord out.

use std::sync::Arc;

use chrono::NaiveDate;
use trendcall_core::classifier::{FixedClassifier, LogisticModel};
use trendcall_core::decision::golden_cross;
use trendcall_core::domain::{
    ActionLabel, Prediction, PriceSeries, StrategyNote, TradeStatus, FEATURE_COUNT,
};
use trendcall_core::features::{compute_features, feature_table, FeatureError};
use trendcall_core::pipeline::{ScoreError, ScoringPipeline};

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn pipeline(prediction: Prediction) -> ScoringPipeline {
    ScoringPipeline::new(Arc::new(FixedClassifier::new(prediction)))
}

fn flat_then_jump(flat: usize, jump: f64) -> PriceSeries {
    let mut closes = vec![10.0; flat];
    closes.push(jump);
    PriceSeries::from_closes("TSLA", &closes)
}

// ─── Flat-then-jump example ─────────────────────────────────────────

#[test]
fn flat_then_jump_prices() {
    let record = pipeline(Prediction::Up)
        .score(&flat_then_jump(20, 15.0), run_date())
        .unwrap();

    assert_eq!(record.ticker(), "TSLA");
    assert_eq!(record.date(), run_date());
    assert_eq!(record.entry_price(), 15.00);
    assert_eq!(record.stop_price(), 14.25);
    assert_eq!(record.target_price(), 15.75);
    assert_eq!(record.predicted_direction(), Prediction::Up);
    assert_eq!(record.trade_status(), TradeStatus::AwaitingEntry);
    // The jump is the only change in the RSI window: zero losses saturate at 100.
    assert_eq!(record.rsi(), 100.0);
    assert_eq!(record.strategy_note(), StrategyNote::CriteriaNotMet);
    assert_eq!(record.action_label(), ActionLabel::RecommendWaiting);
}

#[test]
fn twenty_bar_jump_is_one_row_short() {
    let err = pipeline(Prediction::Up)
        .score(&flat_then_jump(19, 15.0), run_date())
        .unwrap_err();
    assert_eq!(
        err,
        ScoreError::InsufficientHistory {
            valid_rows: 1,
            required: 2
        }
    );
}

// ─── Monotone series ────────────────────────────────────────────────

#[test]
fn rising_series_saturates_rsi() {
    let closes: Vec<f64> = (100..130).map(f64::from).collect();
    let series = PriceSeries::from_closes("NVDA", &closes);

    let window = compute_features(&series).unwrap();
    assert_eq!(window.valid_rows, 11);
    assert_eq!(window.latest.rsi, 100.0);
    assert!(window.latest.macd > 0.0);
    assert!(window.latest.macd_signal > 0.0);

    let record = pipeline(Prediction::Up).score(&series, run_date()).unwrap();
    for value in [
        record.entry_price(),
        record.stop_price(),
        record.target_price(),
        record.rsi(),
        record.macd(),
    ] {
        assert!(value.is_finite());
    }
    assert_eq!(record.entry_price(), 129.0);
    assert!(record.macd() > 0.0);
}

// ─── Crossover position ─────────────────────────────────────────────

#[test]
fn cross_fires_only_on_the_jump_bar() {
    // 30 flat bars, then 110 from index 30 onward.
    let mut closes = vec![100.0; 30];
    closes.extend(std::iter::repeat(110.0).take(10));

    for len in 21..=closes.len() {
        let series = PriceSeries::from_closes("X", &closes[..len]);
        let window = compute_features(&series).unwrap();
        let crossed = golden_cross(&window.latest, &window.prior);
        assert_eq!(crossed, len == 31, "prefix of {len} bars");
    }
}

#[test]
fn cross_with_low_rsi_is_worth_entering() {
    // Decline then recovery: SMA10 crosses SMA20 while the 14-bar RSI still
    // carries the losses of the decline.
    let mut closes: Vec<f64> = (0..25).map(|i| 100.0 - i as f64 * 0.5).collect();
    let mut last = *closes.last().unwrap();
    let mut crossed_at = None;
    for _ in 0..20 {
        last += 1.0;
        closes.push(last);
        let series = PriceSeries::from_closes("AMD", &closes);
        let window = compute_features(&series).unwrap();
        if golden_cross(&window.latest, &window.prior) {
            crossed_at = Some(closes.len());
            break;
        }
    }
    let len = crossed_at.expect("recovery should produce a cross");
    let series = PriceSeries::from_closes("AMD", &closes[..len]);
    let window = compute_features(&series).unwrap();

    let record = pipeline(Prediction::Up).score(&series, run_date()).unwrap();
    let expected = if window.latest.rsi < 60.0 {
        ActionLabel::WorthEntering
    } else {
        ActionLabel::RecommendWaiting
    };
    assert_eq!(record.action_label(), expected);

    let down = pipeline(Prediction::Down).score(&series, run_date()).unwrap();
    assert_eq!(down.action_label(), ActionLabel::RecommendWaiting);
    assert_eq!(down.strategy_note(), record.strategy_note());
}

// ─── History requirements ───────────────────────────────────────────

#[test]
fn under_twenty_bars_never_yields_a_row() {
    for len in 0..20 {
        let closes: Vec<f64> = (0..len).map(|i| 50.0 + i as f64).collect();
        let series = PriceSeries::from_closes("X", &closes);
        assert!(feature_table(&series).map_or(true, |rows| rows.is_empty()));
        assert!(pipeline(Prediction::Up).score(&series, run_date()).is_err());
    }
}

#[test]
fn all_missing_closes_is_data_unavailable() {
    let series = PriceSeries::from_closes("X", &[f64::NAN; 40]);
    assert!(matches!(
        compute_features(&series),
        Err(FeatureError::MissingClose { .. })
    ));
    assert!(matches!(
        pipeline(Prediction::Up).score(&series, run_date()),
        Err(ScoreError::DataUnavailable(_))
    ));
}

// ─── Look-ahead ─────────────────────────────────────────────────────

#[test]
fn feature_rows_ignore_future_bars() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + (i as f64 * 0.21).sin() * 6.0 + (i as f64 * 0.05).cos() * 3.0)
        .collect();
    let full = feature_table(&PriceSeries::from_closes("X", &closes)).unwrap();
    let truncated = feature_table(&PriceSeries::from_closes("X", &closes[..60])).unwrap();

    assert_eq!(truncated.len(), 41);
    for (a, b) in truncated.iter().zip(&full) {
        assert_eq!(a.index, b.index);
        assert!((a.sma10 - b.sma10).abs() < 1e-10);
        assert!((a.sma20 - b.sma20).abs() < 1e-10);
        assert!((a.rsi - b.rsi).abs() < 1e-10);
        assert!((a.macd - b.macd).abs() < 1e-10);
        assert!((a.macd_signal - b.macd_signal).abs() < 1e-10);
    }
}

// ─── Logistic model through the pipeline ────────────────────────────

#[test]
fn logistic_model_drives_direction() {
    let closes: Vec<f64> = (100..130).map(f64::from).collect();
    let series = PriceSeries::from_closes("NVDA", &closes);

    let mut weights = [0.0; FEATURE_COUNT];
    weights[1] = 1.0; // MACD
    let bullish = ScoringPipeline::new(Arc::new(LogisticModel::new(weights, 0.0)));
    assert_eq!(
        bullish.score(&series, run_date()).unwrap().predicted_direction(),
        Prediction::Up
    );

    weights[1] = -1.0;
    let bearish = ScoringPipeline::new(Arc::new(LogisticModel::new(weights, 0.0)));
    assert_eq!(
        bearish.score(&series, run_date()).unwrap().predicted_direction(),
        Prediction::Down
    );
    assert_eq!(bearish.classifier_name(), "logistic");
}
