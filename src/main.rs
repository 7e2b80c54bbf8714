mod config;
mod models;
mod pipeline;
mod scraper;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::models::Period;
use crate::pipeline::Pipeline;
use crate::scraper::parsers::parse_month_page;
use crate::storage::{read_csv, CsvStore};

#[derive(Parser)]
#[command(name = "dolar-mep-scraper", about = "Historical dólar MEP rates to CSV", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape every month of the configured years (the default)
    Run {
        /// Scrape all twelve months of this year; repeatable
        #[arg(short, long = "year")]
        years: Vec<i32>,

        /// Scrape exactly this period, e.g. enero-2025; repeatable, overrides --year
        #[arg(short, long = "period")]
        periods: Vec<Period>,
    },

    /// Print the period identifiers a run would request
    Periods {
        #[arg(short, long = "year")]
        years: Vec<i32>,
    },

    /// Extract records from a saved HTML page without fetching anything
    Inspect {
        file: PathBuf,

        /// Period the page belongs to (used for diagnostics only)
        #[arg(short, long, default_value = "enero-2025")]
        period: Period,

        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Summarise a CSV written by a previous run (default: the latest one)
    Stats { file: Option<PathBuf> },
}

fn target_periods(config: &AppConfig, years: Vec<i32>, periods: Vec<Period>) -> Vec<Period> {
    if !periods.is_empty() {
        return periods;
    }
    let years = if years.is_empty() { config.pipeline.years.clone() } else { years };
    Period::for_years(&years)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "dolar_mep_scraper=info,warn",
        1 => "dolar_mep_scraper=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    let command = cli.command.unwrap_or(Command::Run {
        years: vec![],
        periods: vec![],
    });

    match command {
        Command::Run { years, periods } => {
            let _t = utils::Timer::start("Scrape run");
            let periods = target_periods(&config, years, periods);
            let stats = Pipeline::new(config)?.run(&periods).await?;
            if stats.files.is_empty() {
                println!("No data was scraped.");
            } else {
                println!("Scraping completed: {} records", stats.records);
                for path in &stats.files {
                    println!("  {}", path.display());
                }
            }
        }

        Command::Periods { years } => {
            for period in target_periods(&config, years, vec![]) {
                println!("{}", period);
            }
        }

        Command::Inspect { file, period, json } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let records = parse_month_page(&html, &period)?;
            info!("{} records in {:?}", records.len(), file);

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for r in &records {
                    println!("{:<14} {:>12} {:>12} {:>10}", r.date, r.buy_rate, r.sell_rate, r.change);
                }
            }
        }

        Command::Stats { file } => {
            let path = file.unwrap_or_else(|| CsvStore::new(&config.storage).latest_path());
            let records = read_csv(&path)?;
            println!("─────────────────────────────────");
            println!("  Dólar MEP — {}", path.display());
            println!("─────────────────────────────────");
            println!("  Records : {}", records.len());
            println!("  First   : {}", records.first().map_or("—", |r| r.date.as_str()));
            println!("  Last    : {}", records.last().map_or("—", |r| r.date.as_str()));
            println!("─────────────────────────────────");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_subcommand_parses() {
        let cli = Cli::try_parse_from(["dolar-mep-scraper"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_explicit_periods_win_over_years() {
        let cli = Cli::try_parse_from([
            "dolar-mep-scraper", "run", "--year", "2020", "--period", "julio-2024", "-p", "enero-2025",
        ])
        .unwrap();
        let Some(Command::Run { years, periods }) = cli.command else {
            panic!("expected run");
        };

        let periods = target_periods(&AppConfig::default(), years, periods);
        assert_eq!(periods, [Period::from("julio-2024"), Period::from("enero-2025")]);
    }

    #[test]
    fn test_default_periods_cover_configured_years() {
        let periods = target_periods(&AppConfig::default(), vec![], vec![]);
        assert_eq!(periods.len(), 36);
        assert_eq!(periods[0], Period::from("enero-2023"));
        assert_eq!(periods[35], Period::from("diciembre-2025"));

        let periods = target_periods(&AppConfig::default(), vec![2022], vec![]);
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[11], Period::from("diciembre-2022"));
    }
}
