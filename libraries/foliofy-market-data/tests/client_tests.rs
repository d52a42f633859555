//! Tests for the Yahoo Finance client against a mock server.

use foliofy_core::{FolioError, PriceSource};
use foliofy_market_data::{MarketDataConfig, MarketDataError, YahooFinanceClient};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chart_body(long_name: Option<&str>, opens: &[f64], closes: &[f64]) -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "AAPL",
                    "currency": "USD",
                    "longName": long_name,
                    "shortName": "Apple",
                    "regularMarketPrice": closes.last(),
                },
                "timestamp": (0..closes.len()).map(|i| 1_700_000_000 + i as i64 * 86_400).collect::<Vec<_>>(),
                "indicators": {
                    "quote": [{
                        "open": opens,
                        "close": closes,
                        "high": closes,
                        "low": opens,
                        "volume": closes.iter().map(|_| 1000).collect::<Vec<_>>(),
                    }]
                }
            }],
            "error": null
        }
    })
}

fn not_found_body() -> serde_json::Value {
    json!({
        "chart": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }
        }
    })
}

async fn client_for(server: &MockServer) -> YahooFinanceClient {
    YahooFinanceClient::new(MarketDataConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Single quote
// =============================================================================

mod fetch_quote {
    use super::*;

    #[tokio::test]
    async fn test_quote_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .and(query_param("range", "5d"))
            .and(query_param("interval", "1d"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
                Some("Apple Inc."),
                &[170.0, 176.0],
                &[175.0, 180.0],
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let quote = client.fetch_quote("AAPL").await.unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name, "Apple Inc.");
        assert_eq!(quote.current_price, dec!(180.00));
        assert_eq!(quote.previous_close, dec!(175.00));
        assert_eq!(quote.daily_change_pct, dec!(2.86));
    }

    #[tokio::test]
    async fn test_short_name_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chart_body(None, &[100.0], &[101.0])),
            )
            .mount(&server)
            .await;

        let quote = client_for(&server).await.fetch_quote("AAPL").await.unwrap();
        assert_eq!(quote.name, "Apple");
        assert_eq!(quote.previous_close, dec!(100));
        assert_eq!(quote.daily_change_pct, dec!(1));
    }

    #[tokio::test]
    async fn test_unknown_symbol_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/NOPE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        let result = client.quote("NOPE").await;
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(s)) if s == "NOPE"));

        let result = client.fetch_quote("NOPE").await;
        assert!(matches!(result, Err(FolioError::SymbolNotFound(_))));
    }

    #[tokio::test]
    async fn test_error_in_body_is_symbol_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/DELISTED"))
            .respond_with(ResponseTemplate::new(200).set_body_json(not_found_body()))
            .mount(&server)
            .await;

        let result = client_for(&server).await.quote("DELISTED").await;
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_history_is_symbol_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/EMPTY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(None, &[], &[])))
            .mount(&server)
            .await;

        let result = client_for(&server).await.quote("EMPTY").await;
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        match client.quote("AAPL").await {
            Err(MarketDataError::ProviderError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("Expected ProviderError, got {:?}", other),
        }

        let result = client.fetch_quote("AAPL").await;
        assert!(matches!(result, Err(FolioError::MarketData(_))));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.quote("AAPL").await;
        assert!(matches!(result, Err(MarketDataError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_symbol_is_url_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/%5EGSPC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
                Some("S&P 500"),
                &[4990.0],
                &[5000.0],
            )))
            .expect(1)
            .mount(&server)
            .await;

        let quote = client_for(&server).await.quote("^GSPC").await.unwrap();
        assert_eq!(quote.name, "S&P 500");
    }
}

// =============================================================================
// Batch lookups
// =============================================================================

mod fetch_quotes {
    use super::*;

    #[tokio::test]
    async fn test_failures_become_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(
                Some("Apple Inc."),
                &[170.0, 176.0],
                &[175.0, 180.0],
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/BOGUS"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let symbols = vec!["AAPL".to_string(), "BOGUS".to_string(), "MSFT".to_string()];

        let quotes = client.fetch_quotes(&symbols).await;

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes["AAPL"].as_ref().unwrap().current_price, dec!(180));
        assert!(quotes["BOGUS"].is_none());
        assert!(quotes["MSFT"].is_none());
    }
}
