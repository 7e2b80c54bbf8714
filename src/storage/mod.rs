//! CSV persistence for scraped records.

use crate::config::StorageConfig;
use crate::models::Record;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct CsvStore {
    output_dir: PathBuf,
    file_prefix: String,
}

impl CsvStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            file_prefix: config.file_prefix.clone(),
        }
    }

    pub fn timestamped_path<Tz>(&self, now: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.output_dir.join(format!(
            "{}_{}.csv",
            self.file_prefix,
            now.format(TIMESTAMP_FORMAT)
        ))
    }

    pub fn latest_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_latest.csv", self.file_prefix))
    }

    /// Write the same collection to a timestamped file and to the `latest` file.
    /// Nothing is written for an empty collection.
    pub fn persist<Tz>(&self, records: &[Record], now: &DateTime<Tz>) -> Result<Vec<PathBuf>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if records.is_empty() {
            info!("No data to save");
            return Ok(vec![]);
        }

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Could not create dir {:?}", self.output_dir))?;

        let paths = vec![self.timestamped_path(now), self.latest_path()];
        for path in &paths {
            write_csv(path, records)?;
            info!("Data saved to {:?}", path);
        }
        info!("Total records: {}", records.len());

        Ok(paths)
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Columns: date, buy, sell, change. Overwrites an existing file.
pub fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record {} to {:?}", record.date, path))?;
    }

    writer.flush().with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    reader
        .deserialize::<Record>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Row {} in {:?}", i + 1, path)))
        .collect()
}
