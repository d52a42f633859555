//! Yahoo Finance chart API response models.
//!
//! Only the fields needed for a latest-price quote are modelled; everything
//! else in the payload is ignored.

use serde::Deserialize;

/// Top-level wrapper of `/v8/finance/chart/{symbol}`
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Error object Yahoo embeds in the body (e.g. for unknown symbols)
#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBars>,
}

/// Daily OHLC columns; Yahoo uses `null` for bars without trades
#[derive(Debug, Default, Deserialize)]
pub struct QuoteBars {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
