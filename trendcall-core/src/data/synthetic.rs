//! Deterministic synthetic price series for demos and offline runs.
//!
//! Each symbol gets its own geometric random walk. The RNG seed is derived
//! from a BLAKE3 hash of the symbol, so the same symbol always yields the same
//! series regardless of fetch order or thread count.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{BarInterval, DataError, DataProvider, FetchRequest};
use crate::domain::{Bar, PriceSeries};

pub fn symbol_seed(symbol: &str) -> u64 {
    let hash = blake3::hash(symbol.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    end_date: NaiveDate,
    daily_vol: f64,
}

impl SyntheticProvider {
    /// Series end on `end_date` (or the weekday before it).
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            end_date,
            daily_vol: 0.02,
        }
    }

    pub fn with_daily_vol(mut self, daily_vol: f64) -> Self {
        self.daily_vol = daily_vol;
        self
    }

    /// Trading dates (weekdays) ending at `end_date`, oldest first.
    fn dates(&self, request: &FetchRequest) -> Vec<NaiveDate> {
        let start = self.end_date - Duration::days(request.period.approx_days());
        let step = match request.interval {
            BarInterval::Daily => 1,
            BarInterval::Weekly => 7,
            BarInterval::Monthly => 30,
        };

        let mut dates = Vec::new();
        let mut day = self.end_date;
        while day > start {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                dates.push(day);
                day -= Duration::days(step);
            } else {
                day -= Duration::days(1);
            }
        }
        dates.reverse();
        dates
    }

    pub fn generate(&self, symbol: &str, request: &FetchRequest) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
        let mut price: f64 = rng.gen_range(20.0..500.0);
        let drift: f64 = rng.gen_range(-0.001..0.0015);

        let bars = self
            .dates(request)
            .into_iter()
            .map(|date| {
                let shock: f64 = rng.gen_range(-1.0..1.0) * self.daily_vol;
                price = (price * (1.0 + drift + shock)).max(0.01);
                Bar::new(date, price)
            })
            .collect();

        PriceSeries::new(symbol, bars)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, request: &FetchRequest) -> Result<PriceSeries, DataError> {
        Ok(self.generate(symbol, request))
    }

    fn is_available(&self) -> bool {
        true
    }
}
