/// Authentication middleware
use crate::error::ServerError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use foliofy_core::UserId;
use foliofy_identity::IdentityProvider;
use std::sync::Arc;

/// Caller identity established from a verified bearer token
///
/// Can be used as an extractor in handlers behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    /// Only ID tokens carry an email
    pub email: Option<String>,
}

/// Extract the token from an `Authorization: Bearer <token>` header value
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware that verifies the bearer token with the identity provider
pub async fn auth_middleware(
    State(identity): State<Arc<dyn IdentityProvider>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::Unauthorized("Missing authorization header".to_string()))?;

    let token = bearer_token(auth_header).ok_or_else(|| {
        ServerError::Unauthorized("Authorization header must be a Bearer token".to_string())
    })?;

    let claims = identity.verify_token(token).await.map_err(|e| {
        if e.is_token_rejection() {
            tracing::warn!("Token verification failed: {}", e);
            ServerError::Unauthorized(e.to_string())
        } else {
            ServerError::Internal(format!("Token verification unavailable: {}", e))
        }
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId::new(claims.sub),
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Unauthorized("Not authenticated".to_string()))
    }
}
