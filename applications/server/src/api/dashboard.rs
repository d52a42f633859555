/// Dashboard API route
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, Json};
use foliofy_core::Dashboard;

/// GET /dashboard
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Dashboard>> {
    let dashboard = app_state.dashboard.get(&user).await?;
    Ok(Json(dashboard))
}
