/// Shared application state
use crate::services::{DashboardService, HoldingsService};
use foliofy_core::{PortfolioStore, PriceSource};
use foliofy_identity::IdentityProvider;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub holdings: HoldingsService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        identity: Arc<dyn IdentityProvider>,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            identity,
            holdings: HoldingsService::new(Arc::clone(&store), Arc::clone(&prices)),
            dashboard: DashboardService::new(store, prices),
        }
    }
}
