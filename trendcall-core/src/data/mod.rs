//! Data acquisition: providers, CSV import/export, synthetic series.

pub mod canonicalize;
pub mod circuit_breaker;
pub mod csv_file;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{canonical_column, CanonicalColumn, ColumnMap};
pub use circuit_breaker::CircuitBreaker;
pub use csv_file::{parse_series_csv, read_series_csv, write_series_csv, CsvProvider};
pub use provider::{BarInterval, DataError, DataProvider, FetchRequest, Lookback};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
