//! CSV price files: user uploads in, fetched series out.
//!
//! A `CsvProvider` points either at a single file, which then serves every
//! symbol, or at a directory holding `<SYMBOL>.csv` files as written by
//! [`write_series_csv`].

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::canonicalize::ColumnMap;
use super::provider::{DataError, DataProvider, FetchRequest};
use crate::domain::{Bar, PriceSeries};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Unparsable or empty closes become NaN and are dropped by `PriceSeries`.
fn parse_close(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse CSV text into a series. `source` names the input in errors.
pub fn parse_series_csv<R: Read>(
    reader: R,
    symbol: &str,
    source: &Path,
) -> Result<PriceSeries, DataError> {
    let file_err = |reason: String| DataError::FileError {
        path: source.to_path_buf(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| file_err(e.to_string()))?.clone();
    let columns = ColumnMap::resolve(headers.iter()).ok_or_else(|| {
        DataError::MissingCloseColumn {
            path: source.to_path_buf(),
        }
    })?;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| file_err(e.to_string()))?;
        let close = record.get(columns.close).map_or(f64::NAN, parse_close);
        let date = columns
            .date
            .and_then(|i| record.get(i))
            .and_then(parse_date);
        bars.push(Bar { date, close });
    }

    let series = PriceSeries::new(symbol, bars);
    if series.dropped() > 0 {
        debug!(
            symbol,
            path = %source.display(),
            dropped = series.dropped(),
            "dropped rows with unusable closes"
        );
    }
    Ok(series)
}

pub fn read_series_csv(path: &Path, symbol: &str) -> Result<PriceSeries, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::FileError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_series_csv(file, symbol, path)
}

/// Write a series as `date,close`.
pub fn write_series_csv(path: &Path, series: &PriceSeries) -> Result<(), DataError> {
    let file_err = |reason: String| DataError::FileError {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| file_err(e.to_string()))?;
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|e| file_err(e.to_string()))?;
    wtr.write_record(["date", "close"])
        .map_err(|e| file_err(e.to_string()))?;
    for bar in series.bars() {
        let date = bar.date.map(|d| d.to_string()).unwrap_or_default();
        wtr.write_record([date, bar.close.to_string()])
            .map_err(|e| file_err(e.to_string()))?;
    }
    wtr.flush().map_err(|e| file_err(e.to_string()))?;
    Ok(())
}

/// Reads closes from local CSV files.
///
/// The fetch request is not applied: a file is used in full, as exported.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_for(&self, symbol: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{symbol}.csv"))
        } else {
            self.path.clone()
        }
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, _request: &FetchRequest) -> Result<PriceSeries, DataError> {
        let file = self.file_for(symbol);
        if !file.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        read_series_csv(&file, symbol)
    }

    fn is_available(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<PriceSeries, DataError> {
        parse_series_csv(text.as_bytes(), "TSLA", Path::new("upload.csv"))
    }

    #[test]
    fn chinese_close_column() {
        let series = parse("日期,開市,收市\n2024-06-03,1,10.5\n2024-06-04,1,11.0\n").unwrap();
        assert_eq!(series.closes(), vec![10.5, 11.0]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 6, 3));
    }

    #[test]
    fn bom_prefixed_header() {
        let series = parse("\u{feff}Close\n1\n2\n3\n").unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn unparsable_closes_dropped() {
        let series = parse("close\n10\nn/a\n\n11\n-\n12\n").unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert!(series.dropped() >= 2);
    }

    #[test]
    fn close_only_file_is_undated() {
        let series = parse("Close\n3\n1\n2\n").unwrap();
        // No dates: input order is kept.
        assert_eq!(series.closes(), vec![3.0, 1.0, 2.0]);
        assert_eq!(series.last_date(), None);
    }

    #[test]
    fn newest_first_with_bad_date_is_scored_oldest_first() {
        let series =
            parse("Date,Close\n2024-06-05,15\nnot a date,14\n2024-06-03,13\n2024-06-04,14\n")
                .unwrap();
        assert_eq!(series.closes(), vec![13.0, 14.0, 15.0]);
        assert_eq!(series.dropped(), 1);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 6, 5));
    }

    #[test]
    fn missing_close_column() {
        assert!(matches!(
            parse("date,open\n2024-01-01,1\n"),
            Err(DataError::MissingCloseColumn { .. })
        ));
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_date("2024/06/03"), NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(parse_date("06/03/2024"), NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(
            parse_date("2024-06-03 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 6, 3)
        );
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn directory_mode_and_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let d0 = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let bars: Vec<Bar> = (0..5)
            .map(|i| Bar::new(d0 + chrono::Duration::days(i), 100.0 + i as f64 * 0.25))
            .collect();
        let series = PriceSeries::new("NVDA", bars);
        write_series_csv(&dir.path().join("NVDA.csv"), &series).unwrap();

        let provider = CsvProvider::new(dir.path());
        let back = provider.fetch("NVDA", &FetchRequest::default()).unwrap();
        assert_eq!(back, series);

        assert!(matches!(
            provider.fetch("TSLA", &FetchRequest::default()),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn single_file_serves_every_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        std::fs::write(&path, "收市\n1\n2\n").unwrap();
        let provider = CsvProvider::new(&path);
        let a = provider.fetch("TSLA", &FetchRequest::default()).unwrap();
        let b = provider.fetch("NVDA", &FetchRequest::default()).unwrap();
        assert_eq!(a.closes(), b.closes());
        assert_eq!(b.symbol(), "NVDA");
    }
}
