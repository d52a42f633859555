/// Market quote type
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest price snapshot for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    /// Company name (falls back to the symbol)
    pub name: String,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub daily_change_pct: Decimal,
}
