//! Pipeline orchestrator: ties scraper → CSV storage together.
//!
//! Periods are handled strictly one after another: fetch, extract, append,
//! pause, next. A month that cannot be fetched or parsed contributes no rows
//! and never stops the run. Only a failure to write the output is fatal.
//!
//! Rows are concatenated without the period they came from, so the CSV cannot
//! tell two months apart except through the `date` column.

use crate::config::AppConfig;
use crate::models::{Period, Record};
use crate::scraper::{scrape_period, DolarHistoricoScraper, PageSource};
use crate::storage::CsvStore;
use crate::utils::pacing_delay;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{info, warn};

pub struct Pipeline<S = DolarHistoricoScraper> {
    config: AppConfig,
    source: S,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        let source = DolarHistoricoScraper::new(&config.scraper)
            .context("Failed to build scraper")?;
        Ok(Self::with_source(config, source))
    }
}

impl<S: PageSource> Pipeline<S> {
    pub fn with_source(config: AppConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Scrape every period in order and return the concatenated rows.
    pub async fn collect(&self, periods: &[Period]) -> (Vec<Record>, PipelineStats) {
        let mut all_records = Vec::new();
        let mut stats = PipelineStats {
            periods_requested: periods.len(),
            ..PipelineStats::default()
        };

        for (i, period) in periods.iter().enumerate() {
            if i > 0 {
                let pause = pacing_delay(
                    self.config.scraper.request_delay_ms,
                    self.config.scraper.jitter_ms,
                );
                sleep(pause).await;
            }

            match scrape_period(&self.source, period).await {
                Ok(records) => {
                    if records.is_empty() {
                        stats.periods_empty += 1;
                    }
                    all_records.extend(records);
                }
                Err(e) => {
                    warn!("  {:#}", e);
                    stats.periods_failed += 1;
                }
            }
        }

        stats.records = all_records.len();
        (all_records, stats)
    }

    /// Scrape, then write timestamped and latest CSVs unless nothing was found.
    pub async fn run(&self, periods: &[Period]) -> Result<PipelineStats> {
        info!("Starting Dólar MEP scraper...");
        info!("Target months: {} months", periods.len());

        let (records, mut stats) = self.collect(periods).await;

        if records.is_empty() {
            info!("No data was scraped. Please check the website structure.");
            return Ok(stats);
        }

        let store = CsvStore::new(&self.config.storage);
        stats.files = store
            .persist(&records, &Local::now())
            .context("Failed to save scraped data")?;

        info!(
            "=== Done: {} months | {} records | {} failed | {} empty ===",
            stats.periods_requested, stats.records, stats.periods_failed, stats.periods_empty,
        );

        Ok(stats)
    }
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    pub periods_requested: usize,
    pub periods_failed: usize,
    pub periods_empty: usize,
    pub records: usize,
    pub files: Vec<PathBuf>,
}
