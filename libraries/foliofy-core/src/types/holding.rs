/// Holding domain types
use super::{HoldingId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user's position in one ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub id: HoldingId,
    pub user_id: UserId,
    /// Upper-case ticker symbol
    pub symbol: String,
    /// Company display name
    pub name: String,
    pub shares: Decimal,
    /// Average cost per share
    pub avg_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to buy into a symbol (creates or merges)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHolding {
    pub symbol: String,
    pub shares: Decimal,
    pub avg_cost: Decimal,
}

/// Validated holding ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHolding {
    pub user_id: UserId,
    pub symbol: String,
    pub name: String,
    pub shares: Decimal,
    pub avg_cost: Decimal,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHolding {
    #[serde(default)]
    pub shares: Option<Decimal>,
    #[serde(default)]
    pub avg_cost: Option<Decimal>,
}

impl UpdateHolding {
    pub fn is_empty(&self) -> bool {
        self.shares.is_none() && self.avg_cost.is_none()
    }
}
