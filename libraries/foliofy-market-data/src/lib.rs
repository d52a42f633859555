//! Foliofy Market Data
//!
//! Latest-price lookups against the Yahoo Finance chart API.
//!
//! # Example
//!
//! ```ignore
//! use foliofy_core::PriceSource;
//! use foliofy_market_data::{MarketDataConfig, YahooFinanceClient};
//!
//! let client = YahooFinanceClient::new(MarketDataConfig::default())?;
//! let quote = client.fetch_quote("AAPL").await?;
//! println!("{} {} ({}%)", quote.symbol, quote.current_price, quote.daily_change_pct);
//! ```

mod client;
mod error;
mod models;

pub use client::{quote_from_chart, MarketDataConfig, YahooFinanceClient, DEFAULT_BASE_URL};
pub use error::{MarketDataError, Result};
pub use models::{ChartMeta, ChartResponse, ChartResult};
