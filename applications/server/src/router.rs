/// HTTP routing
use crate::{
    api,
    config::CorsSettings,
    error::{Result, ServerError},
    middleware,
    state::AppState,
};
use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// Fails when a configured CORS origin is not a valid header value.
pub fn create_router(app_state: AppState, cors: &CorsSettings) -> Result<Router> {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health))
        .route("/auth/signup", post(api::auth::sign_up))
        .route("/auth/confirm", post(api::auth::confirm))
        .route("/auth/resend-code", post(api::auth::resend_code))
        .route("/auth/signin", post(api::auth::sign_in))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/auth/signout", post(api::auth::sign_out));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/holdings",
            get(api::holdings::list_holdings).post(api::holdings::create_holding),
        )
        .route(
            "/holdings/:id",
            put(api::holdings::update_holding).delete(api::holdings::delete_holding),
        )
        .route("/dashboard", get(api::dashboard::get_dashboard))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.identity),
            middleware::auth_middleware,
        ));

    Ok(public_routes
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(cors_layer(cors)?)
        .with_state(app_state))
}

fn cors_layer(cors: &CorsSettings) -> Result<CorsLayer> {
    let origins = cors
        .origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ServerError::Config(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
