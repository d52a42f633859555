use crate::{holdings, users};
use async_trait::async_trait;
use foliofy_core::{error::Result, storage::PortfolioStore, types::*, FolioError};
use sqlx::SqlitePool;

/// Portfolio store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PortfolioStore for SqliteStore {
    // Users
    async fn ensure_user(&self, id: &UserId, email: Option<&str>) -> Result<User> {
        Ok(users::ensure_exists(&self.pool, id, email).await?)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(users::get_by_id(&self.pool, id).await?)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        Ok(users::get_all(&self.pool).await?)
    }

    // Holdings
    async fn list_holdings(&self, user_id: &UserId) -> Result<Vec<Holding>> {
        Ok(holdings::list_for_user(&self.pool, user_id).await?)
    }

    async fn get_holding(&self, id: &HoldingId, user_id: &UserId) -> Result<Option<Holding>> {
        Ok(holdings::get_for_user(&self.pool, id, user_id).await?)
    }

    async fn create_or_merge_holding(&self, holding: NewHolding) -> Result<Holding> {
        Ok(holdings::create_or_merge(&self.pool, holding).await?)
    }

    async fn update_holding(
        &self,
        id: &HoldingId,
        user_id: &UserId,
        update: UpdateHolding,
    ) -> Result<Holding> {
        holdings::update(&self.pool, id, user_id, update)
            .await?
            .ok_or_else(|| FolioError::HoldingNotFound(id.clone()))
    }

    async fn delete_holding(&self, id: &HoldingId, user_id: &UserId) -> Result<()> {
        if holdings::delete(&self.pool, id, user_id).await? {
            Ok(())
        } else {
            Err(FolioError::HoldingNotFound(id.clone()))
        }
    }
}
