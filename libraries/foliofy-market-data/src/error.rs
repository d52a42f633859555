//! Error types for price lookups.

use foliofy_core::FolioError;
use thiserror::Error;

/// Errors that can occur while fetching a quote.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the symbol or has no recent bars for it
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with an unexpected status
    #[error("Provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    /// Failed to parse provider response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Result type for market data operations.
pub type Result<T> = std::result::Result<T, MarketDataError>;

impl From<MarketDataError> for FolioError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::SymbolNotFound(symbol) => FolioError::SymbolNotFound(symbol),
            other => FolioError::market_data(other.to_string()),
        }
    }
}
