//! Yahoo Finance price client.

use crate::error::{MarketDataError, Result};
use crate::models::{ChartResponse, ChartResult};
use async_trait::async_trait;
use foliofy_core::portfolio::{percent_of, round_stored};
use foliofy_core::{FolioError, PriceSource, StockQuote};
use reqwest::{header, Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public Yahoo Finance query host
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo rejects requests without a browser-like agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Where and how to reach the price provider
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl MarketDataConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Price source backed by the Yahoo Finance chart endpoint.
///
/// One request per symbol: the last five daily bars are enough to find
/// today's close and the one before it, even across weekends.
#[derive(Clone)]
pub struct YahooFinanceClient {
    http: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MarketDataConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(MarketDataError::InvalidUrl(format!(
                "{} (must start with http:// or https://)",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResult> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(symbol)
        );

        debug!(symbol = %symbol, url = %url, "Fetching chart");

        let response = self
            .http
            .get(&url)
            .query(&[("range", "5d"), ("interval", "1d")])
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ProviderError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChartResponse = response.json().await.map_err(|e| {
            MarketDataError::ParseError(format!("Failed to parse chart for {}: {}", symbol, e))
        })?;

        if let Some(error) = body.chart.error {
            warn!(
                symbol = %symbol,
                code = ?error.code,
                description = ?error.description,
                "Provider reported an error"
            );
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        body.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    /// Fetch and compute the quote for one symbol.
    pub async fn quote(&self, symbol: &str) -> Result<StockQuote> {
        let chart = self.fetch_chart(symbol).await?;
        let quote = quote_from_chart(symbol, &chart)?;

        info!(
            symbol = %quote.symbol,
            price = %quote.current_price,
            change_pct = %quote.daily_change_pct,
            "Fetched price"
        );

        Ok(quote)
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn fetch_quote(&self, symbol: &str) -> foliofy_core::Result<StockQuote> {
        self.quote(symbol).await.map_err(FolioError::from)
    }
}

/// Turn the daily bars of a chart into a quote
///
/// Current price is the latest close. Previous close is the close of the bar
/// before it, or the latest bar's open when there is only one bar. Both are
/// rounded to cents.
pub fn quote_from_chart(symbol: &str, chart: &ChartResult) -> Result<StockQuote> {
    let bars = chart.indicators.quote.first();
    let closes: Vec<(usize, f64)> = bars
        .map(|b| {
            b.close
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.map(|c| (i, c)))
                .collect()
        })
        .unwrap_or_default();

    let Some(&(last_index, last_close)) = closes.last() else {
        return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
    };

    let previous_raw = match closes.len() {
        1 => bars
            .and_then(|b| b.open.get(last_index).copied().flatten())
            .unwrap_or(last_close),
        n => closes[n - 2].1,
    };

    let current_price = to_price(last_close)?;
    let previous_close = to_price(previous_raw)?;
    let daily_change_pct = percent_of(current_price - previous_close, previous_close)
        .map_err(|e| MarketDataError::ParseError(e.to_string()))?;

    let name = [&chart.meta.long_name, &chart.meta.short_name]
        .into_iter()
        .flatten()
        .map(|n| n.trim())
        .find(|n| !n.is_empty())
        .unwrap_or(symbol)
        .to_string();

    Ok(StockQuote {
        symbol: symbol.to_string(),
        name,
        current_price,
        previous_close,
        daily_change_pct,
    })
}

fn to_price(raw: f64) -> Result<Decimal> {
    Decimal::from_f64_retain(raw)
        .map(round_stored)
        .ok_or_else(|| MarketDataError::ParseError(format!("Invalid price value: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartMeta, Indicators, QuoteBars};
    use rust_decimal_macros::dec;

    fn chart(
        long: Option<&str>,
        short: Option<&str>,
        open: Vec<Option<f64>>,
        close: Vec<Option<f64>>,
    ) -> ChartResult {
        ChartResult {
            meta: ChartMeta {
                symbol: Some("AAPL".to_string()),
                long_name: long.map(String::from),
                short_name: short.map(String::from),
            },
            timestamp: Vec::new(),
            indicators: Indicators {
                quote: vec![QuoteBars { open, close }],
            },
        }
    }

    #[test]
    fn uses_last_two_closes() {
        let c = chart(
            Some("Apple Inc."),
            None,
            vec![Some(170.0), Some(174.0), Some(176.0)],
            vec![Some(172.5), Some(175.0), Some(180.0)],
        );
        let quote = quote_from_chart("AAPL", &c).unwrap();

        assert_eq!(quote.name, "Apple Inc.");
        assert_eq!(quote.current_price, dec!(180.00));
        assert_eq!(quote.previous_close, dec!(175.00));
        assert_eq!(quote.daily_change_pct, dec!(2.86));
    }

    #[test]
    fn skips_null_bars() {
        let c = chart(
            None,
            None,
            vec![Some(99.0), Some(100.0), None],
            vec![Some(100.0), Some(110.0), None],
        );
        let quote = quote_from_chart("XYZ", &c).unwrap();

        assert_eq!(quote.current_price, dec!(110));
        assert_eq!(quote.previous_close, dec!(100));
        assert_eq!(quote.daily_change_pct, dec!(10));
    }

    #[test]
    fn single_bar_falls_back_to_open() {
        let c = chart(None, Some("Test"), vec![Some(50.0)], vec![Some(55.0)]);
        let quote = quote_from_chart("TST", &c).unwrap();

        assert_eq!(quote.name, "Test");
        assert_eq!(quote.previous_close, dec!(50));
        assert_eq!(quote.daily_change_pct, dec!(10));
    }

    #[test]
    fn name_falls_back_to_symbol() {
        let c = chart(Some("  "), None, vec![Some(1.0)], vec![Some(1.0)]);
        assert_eq!(quote_from_chart("ABC", &c).unwrap().name, "ABC");
    }

    #[test]
    fn prices_are_rounded_to_cents() {
        let c = chart(
            None,
            None,
            vec![None, None],
            vec![Some(123.456_78), Some(150.254_9)],
        );
        let quote = quote_from_chart("RND", &c).unwrap();

        assert_eq!(quote.previous_close, dec!(123.46));
        assert_eq!(quote.current_price, dec!(150.25));
    }

    #[test]
    fn zero_previous_close_gives_zero_change() {
        let c = chart(None, None, vec![Some(0.0)], vec![Some(3.0)]);
        let quote = quote_from_chart("ZRO", &c).unwrap();
        assert_eq!(quote.daily_change_pct, dec!(0));
    }

    #[test]
    fn no_closes_is_symbol_not_found() {
        let c = chart(None, None, vec![None], vec![None]);
        assert!(matches!(
            quote_from_chart("GONE", &c),
            Err(MarketDataError::SymbolNotFound(_))
        ));

        let empty = chart(None, None, Vec::new(), Vec::new());
        assert!(matches!(
            quote_from_chart("GONE", &empty),
            Err(MarketDataError::SymbolNotFound(_))
        ));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = YahooFinanceClient::new(MarketDataConfig::new("ftp://example.com"));
        assert!(matches!(result, Err(MarketDataError::InvalidUrl(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client =
            YahooFinanceClient::new(MarketDataConfig::new("http://localhost:9000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
