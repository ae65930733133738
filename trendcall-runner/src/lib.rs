//! TrendCall Runner: batch scoring, run configuration, export.
//!
//! Sits above `trendcall-core`:
//! - `batch`: score a ticker list sequentially or on the rayon pool
//! - `config`: TOML run configuration and provider/classifier construction
//! - `export`: trade-record CSV and the JSON batch manifest

pub mod batch;
pub mod config;
pub mod export;

pub use batch::{
    normalize_tickers, score_batch, BatchResult, DatasetEntry, ExecutionMode, SkippedTicker,
    TickerOutcome,
};
pub use config::{ConfigError, ModelConfig, OutputConfig, RunConfig, SourceConfig, SourceKind};
pub use export::{
    export_manifest_json, import_manifest_json, records_from_csv, records_to_csv,
    write_manifest, write_records_csv, BatchManifest, CsvOptions, SCHEMA_VERSION,
};
