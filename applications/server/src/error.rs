/// Server error types
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use foliofy_core::FolioError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing, malformed or rejected credentials
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A delegate failed; the message is safe to show to the caller
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Unexpected failure; details are logged, not returned
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<FolioError> for ServerError {
    fn from(err: FolioError) -> Self {
        match err {
            FolioError::HoldingNotFound(_)
            | FolioError::NotFound { .. }
            | FolioError::NoHoldings => ServerError::NotFound(err.to_string()),
            FolioError::PricesUnavailable => ServerError::ServiceUnavailable(err.to_string()),
            FolioError::SymbolNotFound(_) => ServerError::BadRequest(err.to_string()),
            FolioError::InvalidInput(msg) => ServerError::BadRequest(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Unauthorized(msg) => {
                let body = Json(json!({ "error": msg }));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    body,
                )
                    .into_response();
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ServerError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foliofy_core::HoldingId;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (
                FolioError::HoldingNotFound(HoldingId::new("h1")),
                StatusCode::NOT_FOUND,
            ),
            (FolioError::NoHoldings, StatusCode::NOT_FOUND),
            (FolioError::PricesUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                FolioError::SymbolNotFound("ZZZZ".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                FolioError::invalid_input("Shares must be greater than zero"),
                StatusCode::BAD_REQUEST,
            ),
            (FolioError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = ServerError::Unauthorized("Missing token".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn holding_not_found_message() {
        let err = ServerError::from(FolioError::HoldingNotFound(HoldingId::new("abc")));
        assert!(matches!(err, ServerError::NotFound(ref m) if m == "Holding with id abc not found"));
    }
}
