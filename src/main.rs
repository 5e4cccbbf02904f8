//! Carry Trade CLI
//!
//! Evaluates a captured quote snapshot against the instrument catalog and
//! prints carry metrics per instrument.

use anyhow::{Context, Result};
use carry_trade::{
    instrument::{load_catalog, price_instruments},
    market::{load_mep, load_quote_feeds},
    BatchResult, CarryEngine, Catalog, ChartSeries, ColorLimits, EngineConfig, InstrumentFailure,
    ResultRow, SpotRate,
};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carry_trade", version, about = "Carry-trade metrics under the crawling-peg band")]
struct Args {
    /// Quote snapshots (JSON list of {symbol, c} objects, or CSV with symbol,c
    /// columns); several feeds are concatenated in the order given
    #[arg(long, num_args = 1.., required = true)]
    quotes: Vec<PathBuf>,

    /// Catalog CSV (Ticker,Maturity,Payoff); built-in catalog if omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Spot (MEP) rate
    #[arg(long)]
    spot: Option<f64>,

    /// MEP payload snapshot (JSON) used when --spot is not given
    #[arg(long, conflicts_with = "spot")]
    mep: Option<PathBuf>,

    /// Spot rate used when no usable observation is available
    #[arg(long, env = "DEFAULT_MEP_RATE")]
    fallback_spot: Option<f64>,

    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Engine config JSON (band regime, scenarios, colour scale)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Write breakeven vs ceiling chart series to this CSV
    #[arg(long)]
    chart_csv: Option<PathBuf>,

    /// Evaluate instruments on the rayon pool
    #[arg(long)]
    parallel: bool,
}

#[derive(Serialize)]
struct CarryReport<'a> {
    evaluation_date: NaiveDate,
    mep_rate: f64,
    data: &'a [ResultRow],
    failures: &'a [InstrumentFailure],
    color_limits: ColorLimits,
    chart_data: ChartSeries,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => Catalog::default_catalog(),
    };

    let quotes = load_quote_feeds(args.quotes.as_slice())?;

    let observed = match (&args.spot, &args.mep) {
        (Some(spot), _) => SpotRate::from_observation(Some(*spot)),
        (None, Some(path)) => load_mep(path)?,
        (None, None) => SpotRate::Unavailable,
    };
    let spot_rate = observed
        .resolve(args.fallback_spot)
        .context("No usable spot rate: pass --spot, --mep or DEFAULT_MEP_RATE")?;

    let evaluation_date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let instruments = price_instruments(&catalog, &quotes);
    let engine = CarryEngine::new(config);
    let result = if args.parallel {
        engine.evaluate_par(&instruments, spot_rate, evaluation_date)?
    } else {
        engine.evaluate(&instruments, spot_rate, evaluation_date)?
    };

    let chart = result.chart();
    if let Some(path) = &args.chart_csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        chart.write_csv(file)?;
    }

    if args.json {
        let report = CarryReport {
            evaluation_date,
            mep_rate: spot_rate,
            data: &result.rows,
            failures: &result.failures,
            color_limits: result.color_limits,
            chart_data: chart,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&result, engine.config());
    }

    Ok(())
}

fn print_table(result: &BatchResult, config: &EngineConfig) {
    println!("Carry Trade v0.1.0");
    println!("==================\n");
    println!("Evaluation date: {}", result.evaluation_date);
    println!("MEP rate:        {:.2}\n", result.spot_rate);

    let mut header = format!(
        "{:<7} {:>9} {:>10} {:>5} {:>7} {:>8} {:>8}",
        "Ticker", "Price", "Maturity", "Days", "TEM", "TNA", "TEA"
    );
    for rate in &config.scenarios.rates {
        header.push_str(&format!(" {:>7}", rate));
    }
    header.push_str(&format!(
        " {:>7} {:>9} {:>9} {:>7}",
        "Ceiling", "BandTop", "Breakeven", "Margin"
    ));
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    let mut rows: Vec<&ResultRow> = result.rows.iter().collect();
    rows.sort_by_key(|r| r.days_to_maturity);

    for row in rows {
        let mut line = format!(
            "{:<7} {:>9.2} {:>10} {:>5} {:>6.2}% {:>7.2}% {:>7.2}%",
            row.ticker,
            row.price,
            row.maturity.format("%d/%m/%Y").to_string(),
            row.days_to_maturity,
            row.rates.tem * 100.0,
            row.rates.tna * 100.0,
            row.rates.tea * 100.0,
        );
        for value in row.scenario_values() {
            line.push_str(&format!(" {:>6.1}%", value * 100.0));
        }
        line.push_str(&format!(" {:>9.0} {:>9.2}", row.ceiling, row.breakeven));
        match row.ceiling_margin() {
            Some(margin) => line.push_str(&format!(" {:>6.1}%", margin * 100.0)),
            None => line.push_str(&format!(" {:>7}", "-")),
        }
        println!("{}", line);
    }

    if !result.failures.is_empty() {
        println!("\nExcluded:");
        for failure in &result.failures {
            println!("  {}: {}", failure.ticker, failure.error);
        }
    }

    let limits = result.color_limits;
    println!(
        "\nColour limits: [{:.4}, {:.4}] (max |return| {:.4})",
        limits.vmin, limits.vmax, limits.bound
    );
}
