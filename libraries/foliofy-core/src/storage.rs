//! Storage trait for users and holdings

use crate::error::Result;
use crate::types::{Holding, HoldingId, NewHolding, UpdateHolding, User, UserId};
use async_trait::async_trait;

/// Persistent store behind the holdings and dashboard services
///
/// Every holding query is scoped to a user: a holding owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Insert the user if absent; existing rows are left as they are
    async fn ensure_user(&self, id: &UserId, email: Option<&str>) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    // ========================================================================
    // Holdings
    // ========================================================================

    /// Get all holdings of a user
    async fn list_holdings(&self, user_id: &UserId) -> Result<Vec<Holding>>;

    /// Get a holding by ID
    async fn get_holding(&self, id: &HoldingId, user_id: &UserId) -> Result<Option<Holding>>;

    /// Create a holding, or fold it into the user's existing holding for the
    /// same symbol using a weighted-average cost
    async fn create_or_merge_holding(&self, holding: NewHolding) -> Result<Holding>;

    /// Overwrite the provided fields of a holding
    async fn update_holding(
        &self,
        id: &HoldingId,
        user_id: &UserId,
        update: UpdateHolding,
    ) -> Result<Holding>;

    /// Delete a holding
    async fn delete_holding(&self, id: &HoldingId, user_id: &UserId) -> Result<()>;
}
