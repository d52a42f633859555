/// Core traits for Foliofy
use crate::error::Result;
use crate::types::StockQuote;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of live stock prices
///
/// Implementers only need `fetch_quote`; the batch variant looks symbols up
/// one after another and isolates failures.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the latest quote for one symbol
    ///
    /// # Errors
    /// `FolioError::SymbolNotFound` when the provider does not know the
    /// symbol, `FolioError::MarketData` for any other provider failure
    async fn fetch_quote(&self, symbol: &str) -> Result<StockQuote>;

    /// Fetch quotes for several symbols
    ///
    /// Never fails as a whole: a symbol whose lookup failed maps to `None`.
    async fn fetch_quotes(&self, symbols: &[String]) -> HashMap<String, Option<StockQuote>> {
        let mut quotes = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let quote = match self.fetch_quote(symbol).await {
                Ok(quote) => Some(quote),
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Failed to fetch price");
                    None
                }
            };
            quotes.insert(symbol.clone(), quote);
        }
        quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceSource for FlakySource {
        async fn fetch_quote(&self, symbol: &str) -> Result<StockQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match symbol {
                "AAPL" => Ok(StockQuote {
                    symbol: symbol.to_string(),
                    name: "Apple Inc.".to_string(),
                    current_price: dec!(180.00),
                    previous_close: dec!(175.00),
                    daily_change_pct: dec!(2.86),
                }),
                "BOGUS" => Err(FolioError::SymbolNotFound(symbol.to_string())),
                _ => Err(FolioError::market_data("upstream timeout")),
            }
        }
    }

    #[tokio::test]
    async fn fetch_quotes_isolates_failures() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
        };
        let symbols = vec!["AAPL".to_string(), "BOGUS".to_string(), "GOOGL".to_string()];

        let quotes = source.fetch_quotes(&symbols).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes["AAPL"].as_ref().unwrap().current_price, dec!(180.00));
        assert!(quotes["BOGUS"].is_none());
        assert!(quotes["GOOGL"].is_none());
    }

    #[tokio::test]
    async fn fetch_quotes_empty_input() {
        let source = FlakySource {
            calls: AtomicUsize::new(0),
        };
        let quotes = source.fetch_quotes(&[]).await;
        assert!(quotes.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
