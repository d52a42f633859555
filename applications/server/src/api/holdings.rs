/// Holdings API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use foliofy_core::{CreateHolding, Holding, HoldingId, UpdateHolding};

/// GET /holdings
pub async fn list_holdings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Holding>>> {
    let holdings = app_state.holdings.list(&user).await?;
    Ok(Json(holdings))
}

/// POST /holdings - buying a symbol already held merges into that holding
pub async fn create_holding(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateHolding>,
) -> Result<(StatusCode, Json<Holding>)> {
    let holding = app_state.holdings.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(holding)))
}

/// PUT /holdings/:id
pub async fn update_holding(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateHolding>,
) -> Result<Json<Holding>> {
    let holding = app_state
        .holdings
        .update(&user, &HoldingId::new(id), req)
        .await?;
    Ok(Json(holding))
}

/// DELETE /holdings/:id
pub async fn delete_holding(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    app_state.holdings.delete(&user, &HoldingId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
