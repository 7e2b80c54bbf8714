use crate::models::{Period, Record};
use anyhow::Result;
use tracing::{debug, info};

use super::document::{CandidateTable, HtmlDocument, PageDocument};

/// `id` of the table the site is expected to publish its rates in.
pub const PREFERRED_TABLE_ID: &str = "dataTable";

const MIN_ROWS: usize = 2;
const MIN_COLUMNS: usize = 4;

// ── Monthly rate page ─────────────────────────────────────────────────────────

pub fn parse_month_page(html: &str, period: &Period) -> Result<Vec<Record>> {
    let doc = HtmlDocument::parse(html)?;
    Ok(extract_records(&doc, period))
}

/// Pull every dated row out of every viable table on the page.
///
/// The `dataTable` lookup is reported but does not narrow the scan: all tables
/// contribute, in document order.
pub fn extract_records<D: PageDocument>(doc: &D, period: &Period) -> Vec<Record> {
    let tables = doc.tables();

    match period.year() {
        Some(year) => debug!("  Extracting {} (year {})", period, year),
        None => debug!("  Extracting {} (year unknown)", period),
    }

    if doc.find_table("id", PREFERRED_TABLE_ID).is_some() {
        info!("  Found table with id '{}' for {}", PREFERRED_TABLE_ID, period);
        info!(
            "  Scanning all {} tables regardless of '{}'",
            tables.len(),
            PREFERRED_TABLE_ID
        );
    } else {
        info!("  Found {} tables on the page for {}", tables.len(), period);
        for (i, table) in tables.iter().enumerate() {
            if table.rows.len() >= MIN_ROWS {
                info!("    Table {} headers: {}", i + 1, header_text(table));
            }
        }
    }

    tables.iter().flat_map(table_records).collect()
}

/// Records from one table, or none if it lacks a header plus a data row of four columns.
pub fn table_records(table: &CandidateTable) -> Vec<Record> {
    if table.rows.len() < MIN_ROWS {
        return vec![];
    }
    let header_cells = table.header().map_or(0, <[String]>::len);
    if header_cells < MIN_COLUMNS {
        debug!("    Skipping table with {} header cells", header_cells);
        return vec![];
    }

    table
        .data_rows()
        .iter()
        .filter_map(|cells| positional_record(cells))
        .collect()
}

/// Header cells joined by spaces. Diagnostics only; never used to pick columns.
pub fn header_text(table: &CandidateTable) -> String {
    table.header().map(|h| h.join(" ")).unwrap_or_default()
}

/// First four cells as date | buy | sell | change. `None` when the row is
/// short or the date cell is blank.
pub fn positional_record(cells: &[String]) -> Option<Record> {
    let [date, buy, sell, change, ..] = cells else {
        return None;
    };
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    Some(Record {
        date: date.to_string(),
        buy_rate: buy.trim().to_string(),
        sell_rate: sell.trim().to_string(),
        change: change.trim().to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
