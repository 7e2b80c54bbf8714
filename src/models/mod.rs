use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// ── Period ────────────────────────────────────────────────────────────────────

/// Month names as they appear in the site's URLs.
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A month-year key such as `enero-2025`.
///
/// Kept as the raw identifier: it is appended to the base URL verbatim and only
/// split apart to report the year in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    pub fn new(month: &str, year: i32) -> Self {
        Self(format!("{}-{}", month, year))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Year part of the identifier, if the text after the first `-` is a number.
    pub fn year(&self) -> Option<i32> {
        self.0.split('-').nth(1)?.trim().parse().ok()
    }

    /// Every month of every year, year-major (`enero-2023` … `diciembre-2023`, `enero-2024` …).
    pub fn for_years(years: &[i32]) -> Vec<Period> {
        years
            .iter()
            .flat_map(|&year| MONTHS.iter().map(move |month| Period::new(month, year)))
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Period {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<String> for Period {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl FromStr for Period {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One row of a monthly rate table. Every field is the cell text as published.
///
/// There is no period field: once collections from several months are
/// concatenated, a row can only be attributed to its month through `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: String,
    #[serde(rename = "buy")]
    pub buy_rate: String,
    #[serde(rename = "sell")]
    pub sell_rate: String,
    pub change: String,
}
