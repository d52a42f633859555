//! Portfolio arithmetic
//!
//! Weighted-average merging of repeated purchases and the dashboard
//! aggregation that joins holdings with live quotes. Everything here is pure
//! and uses exact decimal arithmetic; overflow surfaces as
//! [`FolioError::InvalidInput`] instead of a panic.

use crate::error::{FolioError, Result};
use crate::types::{
    CreateHolding, Dashboard, DashboardHolding, Holding, StockQuote, UpdateHolding,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Fractional digits kept for persisted share counts and costs
pub const STORED_SCALE: u32 = 2;

/// Fractional digits reported for percentages
pub const PERCENT_SCALE: u32 = 2;

/// Share count and average cost of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub shares: Decimal,
    pub avg_cost: Decimal,
}

impl Position {
    pub fn new(shares: Decimal, avg_cost: Decimal) -> Self {
        Self { shares, avg_cost }
    }

    /// Fold another purchase into this position
    ///
    /// shares = s₀ + s₁, avg_cost = (s₀·c₀ + s₁·c₁) / shares
    pub fn merge(self, incoming: Position) -> Result<Position> {
        let shares = add(self.shares, incoming.shares)?;
        if shares.is_zero() {
            return Err(FolioError::invalid_input(
                "Merged position would hold zero shares",
            ));
        }

        let held = mul(self.shares, self.avg_cost)?;
        let bought = mul(incoming.shares, incoming.avg_cost)?;
        let avg_cost = div(add(held, bought)?, shares)?;

        Ok(Position { shares, avg_cost })
    }

    /// Round to the persisted precision
    pub fn rounded(self) -> Position {
        Position {
            shares: round_stored(self.shares),
            avg_cost: round_stored(self.avg_cost),
        }
    }
}

/// Round a share count or cost to the persisted precision (half away from zero)
pub fn round_stored(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(STORED_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Trim and upper-case a ticker symbol
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(FolioError::invalid_input("Symbol must not be empty"));
    }
    if symbol.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(FolioError::invalid_input(format!(
            "Symbol must not contain whitespace: {}",
            raw.trim()
        )));
    }
    Ok(symbol)
}

/// Check a purchase and return its normalized symbol
pub fn validate_create(request: &CreateHolding) -> Result<String> {
    let symbol = normalize_symbol(&request.symbol)?;
    if request.shares <= Decimal::ZERO {
        return Err(FolioError::invalid_input("Shares must be greater than zero"));
    }
    if request.avg_cost < Decimal::ZERO {
        return Err(FolioError::invalid_input("Average cost must not be negative"));
    }
    Ok(symbol)
}

/// Check a partial update; only provided fields are validated
pub fn validate_update(update: &UpdateHolding) -> Result<()> {
    if update.shares.is_some_and(|s| s < Decimal::ZERO) {
        return Err(FolioError::invalid_input("Shares must not be negative"));
    }
    if update.avg_cost.is_some_and(|c| c < Decimal::ZERO) {
        return Err(FolioError::invalid_input("Average cost must not be negative"));
    }
    Ok(())
}

/// `part / whole * 100`, or zero when `whole` is zero
pub fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = div(part, whole)?;
    Ok(mul(ratio, Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Join holdings with quotes into the dashboard view
///
/// Holdings whose quote is missing are left out. Totals and allocations are
/// computed over the included holdings only.
///
/// # Errors
/// `NoHoldings` for an empty portfolio, `PricesUnavailable` when no holding
/// could be priced.
pub fn build_dashboard(
    holdings: &[Holding],
    quotes: &HashMap<String, Option<StockQuote>>,
    as_of: DateTime<Utc>,
) -> Result<Dashboard> {
    if holdings.is_empty() {
        return Err(FolioError::NoHoldings);
    }

    let mut rows = Vec::with_capacity(holdings.len());
    let mut total_value = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for holding in holdings {
        let Some(quote) = quotes.get(&holding.symbol).and_then(Option::as_ref) else {
            tracing::warn!(symbol = %holding.symbol, "Skipping holding - price data unavailable");
            continue;
        };

        let market_value = mul(holding.shares, quote.current_price)?;
        let cost_basis = mul(holding.shares, holding.avg_cost)?;
        let pnl = market_value - cost_basis;

        total_value = add(total_value, market_value)?;
        total_cost = add(total_cost, cost_basis)?;

        rows.push(DashboardHolding {
            symbol: holding.symbol.clone(),
            name: holding.name.clone(),
            shares: holding.shares,
            avg_cost: holding.avg_cost,
            current_price: quote.current_price,
            previous_close: quote.previous_close,
            daily_change_pct: quote.daily_change_pct,
            market_value,
            cost_basis,
            pnl,
            pnl_pct: percent_of(pnl, cost_basis)?,
            // filled in once the total is known
            allocation_pct: Decimal::ZERO,
        });
    }

    if rows.is_empty() {
        return Err(FolioError::PricesUnavailable);
    }

    for row in &mut rows {
        row.allocation_pct = percent_of(row.market_value, total_value)?;
    }

    let total_pnl = total_value - total_cost;
    let total_pnl_pct = percent_of(total_pnl, total_cost)?;

    tracing::info!(
        holdings = rows.len(),
        total_value = %total_value,
        total_pnl = %total_pnl,
        total_pnl_pct = %total_pnl_pct,
        "Dashboard calculated"
    );

    Ok(Dashboard {
        total_value,
        total_cost,
        total_pnl,
        total_pnl_pct,
        last_updated: as_of,
        holdings: rows,
    })
}

fn overflow() -> FolioError {
    FolioError::invalid_input("Arithmetic overflow")
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(overflow)
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(overflow)
}

fn div(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_div(b).ok_or_else(overflow)
}
