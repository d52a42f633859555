/// Dashboard view types (computed, never persisted)
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced holding on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardHolding {
    pub symbol: String,
    pub name: String,
    pub shares: Decimal,
    pub avg_cost: Decimal,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub daily_change_pct: Decimal,
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub pnl: Decimal,
    pub pnl_pct: Decimal,
    /// Share of the portfolio's market value, in percent
    pub allocation_pct: Decimal,
}

/// Portfolio totals over every holding that could be priced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_pnl: Decimal,
    pub total_pnl_pct: Decimal,
    pub last_updated: DateTime<Utc>,
    pub holdings: Vec<DashboardHolding>,
}
