pub mod document;
pub mod http_client;
pub mod parsers;

use crate::config::ScraperConfig;
use crate::models::{Period, Record};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

use self::http_client::HttpClient;
use self::parsers::parse_month_page;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Anything that can produce the raw page for a period.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, period: &Period) -> Result<String>;
}

// ── dolarhistorico.com scraper ────────────────────────────────────────────────

pub struct DolarHistoricoScraper {
    client: HttpClient,
    base_url: String,
}

impl DolarHistoricoScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL for one month, e.g. enero-2025 → /cotizacion-dolar-mep/mes/enero-2025
    pub fn month_url(&self, period: &Period) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, period);
        Url::parse(&raw).with_context(|| format!("Invalid URL {}", raw))
    }
}

#[async_trait]
impl PageSource for DolarHistoricoScraper {
    async fn fetch_page(&self, period: &Period) -> Result<String> {
        let url = self.month_url(period)?;
        info!("  Trying URL: {}", url);

        Ok(self.client.get_text(url.as_str()).await?)
    }
}

/// Fetch and extract one period. A failed fetch or an unparsable page is
/// reported and counts as a month without data.
pub async fn scrape_period<S>(source: &S, period: &Period) -> Result<Vec<Record>>
where
    S: PageSource + ?Sized,
{
    info!("Scraping data for {}...", period);

    let html = source
        .fetch_page(period)
        .await
        .with_context(|| format!("No content found for {}", period))?;

    let records = parse_month_page(&html, period)
        .with_context(|| format!("Could not parse page for {}", period))?;

    if records.is_empty() {
        warn!("  No data found for {}", period);
    } else {
        info!("  Found {} records for {}", records.len(), period);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedPages(HashMap<String, String>);

    #[async_trait]
    impl PageSource for FixedPages {
        async fn fetch_page(&self, period: &Period) -> Result<String> {
            self.0
                .get(period.as_str())
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP error 404 Not Found"))
        }
    }

    #[test]
    fn test_month_url() {
        let config = ScraperConfig {
            base_url: "https://dolarhistorico.com/cotizacion-dolar-mep/mes/".into(),
            ..ScraperConfig::default()
        };
        let scraper = DolarHistoricoScraper::new(&config).unwrap();
        let url = scraper.month_url(&Period::from("septiembre-2024")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dolarhistorico.com/cotizacion-dolar-mep/mes/septiembre-2024"
        );
    }

    #[test]
    fn test_month_url_rejects_bad_base() {
        let config = ScraperConfig {
            base_url: "not a url".into(),
            ..ScraperConfig::default()
        };
        let scraper = DolarHistoricoScraper::new(&config).unwrap();
        assert!(scraper.month_url(&Period::from("enero-2025")).is_err());
    }

    #[test]
    fn test_scrape_period_extracts_page() {
        let html = "<table><tr><th>Fecha</th><th>Compra</th><th>Venta</th><th>Variación</th></tr>\
                    <tr><td>01/01/2025</td><td>1050.00</td><td>1060.00</td><td>+0.5%</td></tr></table>";
        let source = FixedPages(HashMap::from([("enero-2025".to_string(), html.to_string())]));

        let records = tokio_test::block_on(scrape_period(&source, &Period::from("enero-2025"))).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sell_rate, "1060.00");
    }

    #[test]
    fn test_scrape_period_surfaces_fetch_failure() {
        let source = FixedPages(HashMap::new());
        let err = tokio_test::block_on(scrape_period(&source, &Period::from("enero-2025"))).unwrap_err();
        assert!(format!("{:#}", err).contains("enero-2025"));
    }
}
