/// Holdings service - per-user CRUD with merge-on-create
use crate::error::{Result, ServerError};
use crate::middleware::AuthenticatedUser;
use foliofy_core::portfolio::{validate_create, validate_update};
use foliofy_core::{
    CreateHolding, FolioError, Holding, HoldingId, NewHolding, PortfolioStore, PriceSource,
    UpdateHolding,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct HoldingsService {
    store: Arc<dyn PortfolioStore>,
    prices: Arc<dyn PriceSource>,
}

impl HoldingsService {
    pub fn new(store: Arc<dyn PortfolioStore>, prices: Arc<dyn PriceSource>) -> Self {
        Self { store, prices }
    }

    /// All holdings of the caller
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<Holding>> {
        self.store
            .ensure_user(&user.user_id, user.email.as_deref())
            .await?;

        Ok(self.store.list_holdings(&user.user_id).await?)
    }

    /// Record a purchase
    ///
    /// The company name comes from the price source, which also rejects
    /// symbols it does not know.
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateHolding,
    ) -> Result<Holding> {
        self.store
            .ensure_user(&user.user_id, user.email.as_deref())
            .await?;

        let symbol = validate_create(&request)?;

        let quote = self.prices.fetch_quote(&symbol).await.map_err(|e| match e {
            FolioError::SymbolNotFound(_) => {
                tracing::info!(symbol = %symbol, "Rejected unknown symbol");
                ServerError::BadRequest(format!("Invalid stock symbol: {}", symbol))
            }
            other => {
                tracing::error!(symbol = %symbol, error = %other, "Symbol lookup failed");
                ServerError::Upstream("Failed to fetch stock information".to_string())
            }
        })?;

        let holding = self
            .store
            .create_or_merge_holding(NewHolding {
                user_id: user.user_id.clone(),
                symbol,
                name: quote.name,
                shares: request.shares,
                avg_cost: request.avg_cost,
            })
            .await?;

        Ok(holding)
    }

    /// Overwrite shares and/or average cost of one of the caller's holdings
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &HoldingId,
        update: UpdateHolding,
    ) -> Result<Holding> {
        validate_update(&update)?;

        Ok(self.store.update_holding(id, &user.user_id, update).await?)
    }

    /// Remove one of the caller's holdings
    pub async fn delete(&self, user: &AuthenticatedUser, id: &HoldingId) -> Result<()> {
        self.store.delete_holding(id, &user.user_id).await?;
        tracing::info!(holding_id = %id, user_id = %user.user_id, "Deleted holding");
        Ok(())
    }
}
