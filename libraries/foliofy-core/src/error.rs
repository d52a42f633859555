/// Core error types for Foliofy
use crate::types::HoldingId;
use thiserror::Error;

/// Result type alias using `FolioError`
pub type Result<T> = std::result::Result<T, FolioError>;

/// Core error type for Foliofy
#[derive(Error, Debug)]
pub enum FolioError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Holding not found (or owned by another user)
    #[error("Holding with id {0} not found")]
    HoldingNotFound(HoldingId),

    /// The user has nothing to aggregate
    #[error("No holdings found for user")]
    NoHoldings,

    /// Every price lookup for the portfolio failed
    #[error("Unable to fetch stock prices for any holdings")]
    PricesUnavailable,

    /// The market data provider does not know the symbol
    #[error("Invalid stock symbol: {0}")]
    SymbolNotFound(String),

    /// The market data provider failed for another reason
    #[error("Market data error: {0}")]
    MarketData(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FolioError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a market data error
    pub fn market_data(msg: impl Into<String>) -> Self {
        Self::MarketData(msg.into())
    }
}
