//! Command-line interface for advisor-rs

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use comfy_table::Table;
use tracing::info;

use advisor_signals::recommend;
use advisor_stock::api::AlphaVantageClient;
use advisor_stock::chart::render_price_chart;
use advisor_stock::pipeline::normalize_symbol;
use advisor_stock::{AdvisorConfig, AnalysisPipeline, MarketSnapshot};

#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Stock analysis with deterministic signals and LLM commentary", long_about = None)]
struct Args {
    /// Ticker symbol to analyze (prompted for when omitted)
    ticker: Option<String>,

    /// Write the price chart SVG to this path
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Skip LLM narration; print fetched data and the rule verdict only
    #[arg(long)]
    data_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();
    advisor_core::init_tracing();

    let args = Args::parse();

    let ticker = match args.ticker {
        Some(ticker) => ticker,
        None => prompt_ticker()?,
    };
    let symbol = normalize_symbol(&ticker)?;

    let snapshot = if args.data_only {
        let snapshot = fetch_snapshot_data_only(&symbol).await?;
        let verdict = recommend(&snapshot.signals());

        println!(
            "\n{} verdict: {} (fundamental: {}, technical: {})",
            snapshot.symbol,
            verdict.recommendation.label(),
            verdict.fundamental_outlook.label(),
            verdict.technical_outlook.label()
        );
        print_metrics(&snapshot);
        snapshot
    } else {
        let config = Arc::new(AdvisorConfig::from_env()?);
        let pipeline = AnalysisPipeline::new(config)?;

        info!("Analyzing {}", symbol);
        let report = pipeline.analyze(&symbol).await?;

        println!("{}", report.format_report());
        print_metrics(&report.snapshot);
        report.snapshot
    };

    if let Some(path) = args.chart {
        let svg = render_price_chart(&snapshot)?;
        std::fs::write(&path, svg)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        println!("Chart written to {}", path.display());
    }

    Ok(())
}

/// Interactive fallback when no ticker argument was given
fn prompt_ticker() -> anyhow::Result<String> {
    print!("Enter a stock ticker (e.g., AAPL): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Fetch a snapshot without building the LLM side of the pipeline
///
/// The overview is optional here for the same reason as in the pipeline:
/// missing fundamentals classify as Neutral, they are not a failure.
async fn fetch_snapshot_data_only(symbol: &str) -> anyhow::Result<MarketSnapshot> {
    let api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
        .context("ALPHA_VANTAGE_API_KEY environment variable not set")?;
    let client = AlphaVantageClient::new(api_key, 5, Duration::from_secs(30))?;

    let bars = client.get_daily(symbol).await?;
    let overview = match client.get_company_overview(symbol).await {
        Ok(overview) => Some(overview),
        Err(err) => {
            tracing::warn!(symbol = %symbol, error = %err, "Company overview unavailable");
            None
        }
    };

    Ok(MarketSnapshot::from_parts(symbol, bars, overview.as_ref())?)
}

/// Print the fetched metrics as a table
fn print_metrics(snapshot: &MarketSnapshot) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Current price".to_string(),
        format!("${:.2}", snapshot.current_price),
    ]);
    table.add_row(vec!["Market cap".to_string(), fmt_opt(snapshot.market_cap)]);
    table.add_row(vec!["P/E ratio".to_string(), fmt_opt(snapshot.pe_ratio)]);
    table.add_row(vec!["EPS".to_string(), fmt_opt(snapshot.eps)]);
    table.add_row(vec!["50-day MA".to_string(), fmt_opt(snapshot.ma50)]);
    table.add_row(vec!["200-day MA".to_string(), fmt_opt(snapshot.ma200)]);
    table.add_row(vec!["14-day RSI".to_string(), fmt_opt(snapshot.rsi14)]);
    table.add_row(vec![
        "Bollinger upper".to_string(),
        fmt_opt(snapshot.bollinger_upper),
    ]);
    table.add_row(vec![
        "Bollinger lower".to_string(),
        fmt_opt(snapshot.bollinger_lower),
    ]);

    println!("{table}");
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}
