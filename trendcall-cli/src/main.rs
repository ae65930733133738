//! TrendCall CLI: score tickers, inspect features, fetch price files.
//!
//! Commands:
//! - `score`: fetch closes, run the classifier and rule overlay, print and
//!   optionally export one trade record per ticker
//! - `explain`: print the most recent feature rows for one ticker
//! - `fetch`: download Yahoo closes to `<DIR>/<SYMBOL>.csv` for offline use
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries the
//! result table.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trendcall_core::data::{
    write_series_csv, BarInterval, CircuitBreaker, DataProvider, FetchRequest, Lookback,
    YahooProvider,
};
use trendcall_core::domain::{Prediction, TradeRecord};
use trendcall_core::features::feature_table;
use trendcall_core::pipeline::ScoringPipeline;
use trendcall_runner::{
    score_batch, write_manifest, write_records_csv, BatchManifest, CsvOptions, ModelConfig,
    RunConfig, SourceKind,
};

#[derive(Parser)]
#[command(
    name = "trendcall",
    about = "TrendCall: daily indicator scoring with a golden-cross rule overlay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score tickers and print one trade record per ticker.
    Score {
        /// Tickers to score (e.g., TSLA NVDA). Defaults to the config's list.
        tickers: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Model artifact: `.json` logistic model or `.onnx` model.
        #[arg(long, conflicts_with = "assume")]
        model: Option<PathBuf>,

        /// Skip the model and assume this direction for every ticker.
        #[arg(long, value_enum)]
        assume: Option<Direction>,

        /// Write trade records to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the CSV without a UTF-8 BOM.
        #[arg(long, default_value_t = false)]
        no_bom: bool,

        /// Write manifest.json next to the CSV.
        #[arg(long, default_value_t = false)]
        manifest: bool,

        /// Score tickers in parallel.
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Print the latest feature rows for one ticker.
    Explain {
        ticker: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Number of rows to show.
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Download Yahoo Finance closes as CSV files.
    Fetch {
        /// Symbols to download.
        #[arg(required = true)]
        tickers: Vec<String>,

        #[arg(long, default_value = "6mo")]
        period: Lookback,

        #[arg(long, default_value = "1d")]
        interval: BarInterval,

        /// Output directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
}

/// Where closes come from; shared by `score` and `explain`.
#[derive(Args)]
struct SourceArgs {
    /// Path to a TOML run config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read closes from a CSV file (served for every ticker) or a directory of `<TICKER>.csv`.
    #[arg(long, conflicts_with = "synthetic")]
    csv: Option<PathBuf>,

    /// Use deterministic synthetic closes.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    #[arg(long)]
    period: Option<Lookback>,

    #[arg(long)]
    interval: Option<BarInterval>,

    /// Run date stamped on records (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for Prediction {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Prediction::Up,
            Direction::Down => Prediction::Down,
        }
    }
}

impl SourceArgs {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(path) = &self.csv {
            config.source.kind = SourceKind::Csv { path: path.clone() };
        }
        if self.synthetic {
            config.source.kind = SourceKind::Synthetic;
        }
        if let Some(period) = self.period {
            config.source.period = period;
        }
        if let Some(interval) = self.interval {
            config.source.interval = interval;
        }
        Ok(config)
    }

    fn run_date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            tickers,
            source,
            model,
            assume,
            output,
            no_bom,
            manifest,
            parallel,
        } => run_score(
            tickers, &source, model, assume, output, no_bom, manifest, parallel,
        ),
        Commands::Explain {
            ticker,
            source,
            rows,
        } => run_explain(&ticker, &source, rows),
        Commands::Fetch {
            tickers,
            period,
            interval,
            out_dir,
        } => run_fetch(&tickers, FetchRequest::new(period, interval), &out_dir),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_score(
    tickers: Vec<String>,
    source: &SourceArgs,
    model: Option<PathBuf>,
    assume: Option<Direction>,
    output: Option<PathBuf>,
    no_bom: bool,
    manifest: bool,
    parallel: bool,
) -> Result<()> {
    let mut config = source.resolve()?;
    if !tickers.is_empty() {
        config.tickers = tickers;
    }
    if let Some(path) = model {
        let is_onnx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"));
        config.model = if is_onnx {
            ModelConfig::Onnx { path }
        } else {
            ModelConfig::Logistic { path }
        };
    }
    if let Some(direction) = assume {
        config.model = ModelConfig::Fixed {
            label: Prediction::from(direction).label(),
        };
    }
    if output.is_some() {
        config.output.csv = output;
    }
    if no_bom {
        config.output.bom = false;
    }
    config.output.manifest |= manifest;
    config.parallel |= parallel;
    config.validate()?;

    let run_date = source.run_date();
    let provider = config.build_provider(run_date)?;
    let classifier = config
        .build_classifier()
        .context("failed to load classifier")?;
    let pipeline = ScoringPipeline::new(classifier);
    let request = config.source.request();

    let result = score_batch(
        &config.tickers,
        provider.as_ref(),
        &pipeline,
        &request,
        run_date,
        config.mode(),
    );

    print_records(&result.records);
    for skip in &result.skipped {
        eprintln!("skipped {}: {}", skip.ticker, skip.reason);
    }

    if let Some(path) = &config.output.csv {
        write_records_csv(
            path,
            &result.records,
            CsvOptions {
                bom: config.output.bom,
            },
        )?;
        println!("Trade records saved to: {}", path.display());
    }
    if let Some(path) = config.manifest_path() {
        let manifest = BatchManifest::from_result(
            &result,
            provider.name(),
            pipeline.classifier_name(),
            request,
        );
        write_manifest(&path, &manifest)?;
        info!(path = %path.display(), "wrote manifest");
    }

    if result.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_records(records: &[TradeRecord]) {
    println!(
        "{:<10} {:<8} {:>10} {:>10} {:>10} {:<5} {:>7} {:>8}  {:<22} {:<18} {}",
        "Date", "Ticker", "Entry", "Stop", "Target", "Dir", "RSI", "MACD", "Strategy", "Action",
        "Status"
    );
    for r in records {
        println!(
            "{:<10} {:<8} {:>10.2} {:>10.2} {:>10.2} {:<5} {:>7.2} {:>8.2}  {:<22} {:<18} {}",
            r.date(),
            r.ticker(),
            r.entry_price(),
            r.stop_price(),
            r.target_price(),
            r.predicted_direction(),
            r.rsi(),
            r.macd(),
            r.strategy_note(),
            r.action_label(),
            r.trade_status(),
        );
    }
}

fn run_explain(ticker: &str, source: &SourceArgs, rows: usize) -> Result<()> {
    let config = source.resolve()?;
    let provider = config.build_provider(source.run_date())?;
    let symbol = ticker.trim().to_uppercase();
    let series = provider.fetch(&symbol, &config.source.request())?;
    let table = feature_table(&series)?;

    if table.is_empty() {
        bail!("{symbol}: {} bars, no complete feature row", series.len());
    }

    println!(
        "{:>5} {:<10} {:>10} {:>10} {:>10} {:>7} {:>8} {:>8}",
        "Bar", "Date", "Close", "SMA10", "SMA20", "RSI", "MACD", "Signal"
    );
    for row in table.iter().skip(table.len().saturating_sub(rows)) {
        let date = row.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "{:>5} {:<10} {:>10.2} {:>10.2} {:>10.2} {:>7.2} {:>8.3} {:>8.3}",
            row.index, date, row.close, row.sma10, row.sma20, row.rsi, row.macd, row.macd_signal
        );
    }
    Ok(())
}

fn run_fetch(tickers: &[String], request: FetchRequest, out_dir: &std::path::Path) -> Result<()> {
    let provider = YahooProvider::new(Arc::new(CircuitBreaker::default_provider()))?;
    let symbols = trendcall_runner::normalize_tickers(tickers);
    let mut failed = 0usize;

    for symbol in &symbols {
        match provider.fetch(symbol, &request) {
            Ok(series) => {
                let path = out_dir.join(format!("{symbol}.csv"));
                write_series_csv(&path, &series)?;
                println!("{symbol}: {} bars -> {}", series.len(), path.display());
            }
            Err(e) => {
                warn!(symbol = %symbol, "fetch failed: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("Fetch complete: {}/{} succeeded", symbols.len() - failed, symbols.len());
        std::process::exit(1);
    }
    Ok(())
}
