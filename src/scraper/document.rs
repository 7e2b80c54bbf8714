//! Read-only access to the tables of a parsed page.
//!
//! Extraction only needs three things from a document: every table in order,
//! a table picked out by one of its attributes, and the trimmed text of cells.
//! `PageDocument` names exactly that, so the extractor can run over any parser
//! (or a hand-built fixture in tests).

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// A `<table>` flattened to a grid of trimmed cell text, one inner `Vec` per `<tr>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateTable {
    pub rows: Vec<Vec<String>>,
}

impl CandidateTable {
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }
}

pub trait PageDocument {
    /// Every table on the page, in document order.
    fn tables(&self) -> Vec<CandidateTable>;

    /// First table whose `attr` attribute equals `value`.
    fn find_table(&self, attr: &str, value: &str) -> Option<CandidateTable>;
}

// ── scraper-backed document ───────────────────────────────────────────────────

pub struct HtmlDocument {
    html: Html,
    table_sel: Selector,
    row_sel: Selector,
    cell_sel: Selector,
}

impl HtmlDocument {
    /// Parse a page. html5ever never rejects input; broken markup just yields fewer tables.
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self {
            html: Html::parse_document(html),
            table_sel: selector("table")?,
            row_sel: selector("tr")?,
            cell_sel: selector("td, th")?,
        })
    }

    fn grid(&self, table: ElementRef<'_>) -> CandidateTable {
        let rows = table
            .select(&self.row_sel)
            .map(|tr| tr.select(&self.cell_sel).map(cell_text).collect())
            .collect();
        CandidateTable { rows }
    }
}

impl PageDocument for HtmlDocument {
    fn tables(&self) -> Vec<CandidateTable> {
        self.html
            .select(&self.table_sel)
            .map(|table| self.grid(table))
            .collect()
    }

    fn find_table(&self, attr: &str, value: &str) -> Option<CandidateTable> {
        self.html
            .select(&self.table_sel)
            .find(|table| table.value().attr(attr) == Some(value))
            .map(|table| self.grid(table))
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("{} selector: {:?}", css, e))
}

/// All descendant text, trimmed at the ends only.
pub fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
