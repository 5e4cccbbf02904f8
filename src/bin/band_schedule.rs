//! Print the projected band ceiling month by month
//!
//! Useful to eyeball the exit rates the ceiling scenario will use.

use anyhow::Result;
use carry_trade::EngineConfig;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "band_schedule", about = "Projected crawling-peg ceiling schedule")]
struct Args {
    /// First date of the schedule; defaults to the band anchor date
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Number of monthly steps after the first date
    #[arg(long, default_value_t = 24)]
    months: u32,

    /// Engine config JSON providing the band regime
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit CSV instead of a table
    #[arg(long)]
    csv: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };
    let band = config.band;
    let from = args.from.unwrap_or(band.anchor_date);

    let schedule = band.schedule(from, args.months);
    log::info!(
        "Band anchored {} at {:.2}, growth {} per month: {} points",
        band.anchor_date,
        band.anchor_ceiling,
        band.growth_factor,
        schedule.len()
    );

    if args.csv {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(["date", "ceiling"])?;
        for (date, ceiling) in &schedule {
            wtr.write_record([date.to_string(), format!("{:.2}", ceiling)])?;
        }
        wtr.flush()?;
    } else {
        println!("{:>10} {:>10}", "Date", "Ceiling");
        println!("{}", "-".repeat(21));
        for (date, ceiling) in &schedule {
            println!("{:>10} {:>10.2}", date.to_string(), ceiling);
        }
    }

    Ok(())
}
