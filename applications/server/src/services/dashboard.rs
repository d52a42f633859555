/// Dashboard service - live valuation of a user's portfolio
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use chrono::Utc;
use foliofy_core::portfolio::build_dashboard;
use foliofy_core::{Dashboard, FolioError, PortfolioStore, PriceSource};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn PortfolioStore>,
    prices: Arc<dyn PriceSource>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn PortfolioStore>, prices: Arc<dyn PriceSource>) -> Self {
        Self { store, prices }
    }

    /// Price every holding and aggregate
    ///
    /// Holdings whose price could not be fetched are left out.
    pub async fn get(&self, user: &AuthenticatedUser) -> Result<Dashboard> {
        self.store
            .ensure_user(&user.user_id, user.email.as_deref())
            .await?;

        let holdings = self.store.list_holdings(&user.user_id).await?;
        if holdings.is_empty() {
            return Err(FolioError::NoHoldings.into());
        }

        let symbols: Vec<String> = holdings.iter().map(|h| h.symbol.clone()).collect();
        let quotes = self.prices.fetch_quotes(&symbols).await;

        let dashboard = build_dashboard(&holdings, &quotes, Utc::now())?;

        tracing::debug!(
            user_id = %user.user_id,
            priced = dashboard.holdings.len(),
            total = holdings.len(),
            "Built dashboard"
        );

        Ok(dashboard)
    }
}
