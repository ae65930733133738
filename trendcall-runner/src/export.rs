//! Export: trade-record CSV and the JSON batch manifest.
//!
//! The CSV header is exactly the record field names, in order. Files default
//! to a UTF-8 BOM so spreadsheet tools pick the right encoding for non-ASCII
//! content. The manifest carries a `schema_version`; unknown versions are
//! rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use trendcall_core::data::FetchRequest;
use trendcall_core::domain::{TradeRecord, RECORD_COLUMNS};

use crate::batch::{BatchResult, DatasetEntry, SkippedTicker};

/// Current manifest schema version.
pub const SCHEMA_VERSION: u32 = 1;

const BOM: &str = "\u{feff}";

// ─── CSV export ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub bom: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { bom: true }
    }
}

/// Serialize records as CSV. Prices and indicator values use two decimals.
pub fn records_to_csv(records: &[TradeRecord], options: CsvOptions) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(RECORD_COLUMNS)?;

    for r in records {
        let row = [
            r.date().to_string(),
            r.ticker().to_string(),
            format!("{:.2}", r.entry_price()),
            format!("{:.2}", r.stop_price()),
            format!("{:.2}", r.target_price()),
            r.predicted_direction().to_string(),
            format!("{:.2}", r.rsi()),
            format!("{:.2}", r.macd()),
            r.strategy_note().to_string(),
            r.action_label().to_string(),
            r.trade_status().to_string(),
        ];
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    let body = String::from_utf8(data).context("CSV output is not valid UTF-8")?;
    Ok(if options.bom {
        format!("{BOM}{body}")
    } else {
        body
    })
}

pub fn write_records_csv(path: &Path, records: &[TradeRecord], options: CsvOptions) -> Result<()> {
    let csv = records_to_csv(records, options)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "wrote trade records");
    Ok(())
}

/// Parse records back from CSV text. A leading BOM is ignored.
pub fn records_from_csv(text: &str) -> Result<Vec<TradeRecord>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rdr = csv::Reader::from_reader(text.as_bytes());

    let headers = rdr.headers().context("CSV has no header row")?;
    if !headers.iter().eq(RECORD_COLUMNS.iter().copied()) {
        bail!(
            "unexpected CSV header {:?} (expected {:?})",
            headers.iter().collect::<Vec<_>>(),
            RECORD_COLUMNS
        );
    }

    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("failed to parse CSV row {}", i + 1)))
        .collect()
}

// ─── Manifest ───────────────────────────────────────────────────────

/// Summary of one batch run, written beside the CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub schema_version: u32,
    pub run_date: NaiveDate,
    pub provider: String,
    pub classifier: String,
    pub request: FetchRequest,
    pub tickers: Vec<String>,
    pub record_count: usize,
    pub actionable_count: usize,
    pub skipped: Vec<SkippedTicker>,
    pub datasets: Vec<DatasetEntry>,
}

impl BatchManifest {
    pub fn from_result(
        result: &BatchResult,
        provider: &str,
        classifier: &str,
        request: FetchRequest,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_date: result.run_date,
            provider: provider.to_string(),
            classifier: classifier.to_string(),
            request,
            tickers: result.tickers.clone(),
            record_count: result.records.len(),
            actionable_count: result.actionable().count(),
            skipped: result.skipped.clone(),
            datasets: result.datasets.clone(),
        }
    }
}

pub fn export_manifest_json(manifest: &BatchManifest) -> Result<String> {
    serde_json::to_string_pretty(manifest).context("failed to serialize BatchManifest to JSON")
}

/// Deserialize a manifest, rejecting unknown schema versions.
pub fn import_manifest_json(json: &str) -> Result<BatchManifest> {
    let manifest: BatchManifest =
        serde_json::from_str(json).context("failed to deserialize BatchManifest from JSON")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

pub fn write_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    let json = export_manifest_json(manifest)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
