//! Column-name canonicalisation for user-supplied price files.
//!
//! Exports from brokers and spreadsheets label the close column in many ways
//! (including Chinese headings such as `收市`). Names are trimmed, stripped of
//! a UTF-8 BOM, lower-cased and `_`/`-` folded to spaces before matching.

/// Columns the CSV reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalColumn {
    Date,
    Close,
    /// Used only when no plain close column exists.
    AdjClose,
}

const CLOSE_ALIASES: &[&str] = &[
    "close",
    "closing price",
    "close price",
    "closing",
    "last close",
    "收市",
    "收市價",
    "收盤",
    "收盤價",
    "收盘",
    "收盘价",
];

const ADJ_CLOSE_ALIASES: &[&str] = &["adj close", "adjclose", "adjusted close"];

const DATE_ALIASES: &[&str] = &["date", "datetime", "timestamp", "time", "日期", "交易日"];

pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
}

pub fn canonical_column(name: &str) -> Option<CanonicalColumn> {
    let normalized = normalize_header(name);
    let n = normalized.as_str();
    if CLOSE_ALIASES.contains(&n) {
        Some(CanonicalColumn::Close)
    } else if ADJ_CLOSE_ALIASES.contains(&n) {
        Some(CanonicalColumn::AdjClose)
    } else if DATE_ALIASES.contains(&n) {
        Some(CanonicalColumn::Date)
    } else {
        None
    }
}

/// Indices of the date and close columns in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub close: usize,
}

impl ColumnMap {
    /// Resolve a header row. Returns `None` if no close column exists.
    pub fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut date = None;
        let mut close = None;
        let mut adj_close = None;
        for (i, name) in headers.into_iter().enumerate() {
            match canonical_column(name) {
                Some(CanonicalColumn::Date) => {
                    date.get_or_insert(i);
                }
                Some(CanonicalColumn::Close) => {
                    close.get_or_insert(i);
                }
                Some(CanonicalColumn::AdjClose) => {
                    adj_close.get_or_insert(i);
                }
                None => {}
            }
        }
        close.or(adj_close).map(|close| ColumnMap { date, close })
    }
}
