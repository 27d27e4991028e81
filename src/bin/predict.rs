use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use stockcast::application::analyze;
use stockcast::config::{Config, Mode};
use stockcast::domain::market::{Period, Ticker};
use stockcast::domain::ml::EnrichedRow;
use stockcast::infrastructure::ServiceFactory;
use stockcast::infrastructure::observability::{LogTarget, init_tracing};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, enrich, train and predict for one ticker", long_about = None)]
struct Args {
    /// Ticker symbol, e.g. AAPL
    ticker: String,

    /// History period (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[arg(long)]
    period: Option<String>,

    /// Random forest seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trees in the random forest
    #[arg(long)]
    trees: Option<u16>,

    /// Use the offline random-walk provider
    #[arg(long)]
    mock: bool,

    /// Write the enriched rows to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EnrichedRecord {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    sma_10: f64,
    sma_50: f64,
    rsi_14: f64,
    target: u8,
}

impl From<&EnrichedRow> for EnrichedRecord {
    fn from(row: &EnrichedRow) -> Self {
        Self {
            timestamp: row.bar.timestamp,
            open: row.bar.open,
            high: row.bar.high,
            low: row.bar.low,
            close: row.bar.close,
            volume: row.bar.volume,
            sma_10: row.sma_10,
            sma_50: row.sma_50,
            rsi_14: row.rsi_14,
            target: row.label,
        }
    }
}

fn export_csv(path: &Path, rows: &[EnrichedRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(EnrichedRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogTarget::Stderr);

    let args = Args::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if args.mock {
        config.mode = Mode::Mock;
    }
    if let Some(seed) = args.seed {
        config.model = config.model.with_seed(seed);
    }
    if let Some(trees) = args.trees {
        config.model.n_trees = trees;
    }
    config.model.validate()?;

    let period = match args.period.as_deref() {
        Some(raw) => Period::from_str(raw)?,
        None => config.default_period,
    };
    let ticker = Ticker::parse(&args.ticker)?;

    let provider = ServiceFactory::create_provider(&config);
    info!("Fetching {} over {} from {}", ticker, period, provider.name());
    let series = provider.fetch(&ticker, period).await?;
    println!("Rows fetched:   {}", series.len());

    let model_config = config.model.clone();
    let analysis = tokio::task::spawn_blocking(move || analyze(&series, &model_config))
        .await
        .context("Model task panicked")??;

    println!("Rows enriched:  {}", analysis.rows.len());
    println!(
        "Evaluation:     {} of last {} rows, {}/{} positive calls correct",
        analysis.model.evaluation.evaluated,
        config.model.evaluation_window,
        analysis.model.evaluation.true_positives,
        analysis.model.evaluation.predicted_positives
    );
    println!("Precision:      {:.2}", analysis.model.precision());
    println!(
        "Prediction:     {} (Confidence: {:.2})",
        analysis.prediction.signal, analysis.prediction.confidence
    );

    if let Some(path) = args.export_csv {
        export_csv(&path, &analysis.rows)?;
        println!("Exported {} rows to {}", analysis.rows.len(), path.display());
    }

    Ok(())
}
