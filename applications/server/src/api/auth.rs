/// Authentication API routes
///
/// Thin wrappers around the identity provider. Each endpoint decides which
/// provider errors are the caller's fault.
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use foliofy_identity::{AuthTokens, IdentityError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user_sub: String,
    pub user_confirmed: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub email: String,
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub confirmed: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub id_token: String,
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SignOutRequest {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
    pub message: String,
}

fn check_email(email: &str) -> Result<&str> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ServerError::BadRequest("Invalid email address".to_string())),
    }
}

/// POST /auth/signup
pub async fn sign_up(
    State(app_state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let email = check_email(&req.email)?;

    let outcome = app_state
        .identity
        .sign_up(email, &req.password)
        .await
        .map_err(|e| match e {
            IdentityError::UsernameExists
            | IdentityError::InvalidPassword
            | IdentityError::InvalidParameter(_) => ServerError::BadRequest(e.to_string()),
            other => ServerError::Upstream(format!("Sign up failed: {}", other)),
        })?;

    tracing::info!(user_sub = %outcome.user_sub, "User signed up");

    let message = if outcome.user_confirmed {
        "Sign up complete."
    } else {
        "Sign up complete. Please enter the verification code sent to your email."
    };

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_sub: outcome.user_sub,
            user_confirmed: outcome.user_confirmed,
            message: message.to_string(),
        }),
    ))
}

/// POST /auth/confirm
pub async fn confirm(
    State(app_state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>> {
    let email = check_email(&req.email)?;

    app_state
        .identity
        .confirm_sign_up(email, req.confirmation_code.trim())
        .await
        .map_err(|e| match e {
            IdentityError::CodeMismatch
            | IdentityError::ExpiredCode
            | IdentityError::InvalidParameter(_) => ServerError::BadRequest(e.to_string()),
            other => ServerError::Upstream(format!("Confirmation failed: {}", other)),
        })?;

    Ok(Json(ConfirmResponse {
        confirmed: true,
        message: "Email address confirmed.".to_string(),
    }))
}

/// POST /auth/resend-code
pub async fn resend_code(
    State(app_state): State<AppState>,
    Json(req): Json<ResendCodeRequest>,
) -> Result<Json<MessageResponse>> {
    let email = check_email(&req.email)?;

    let delivery = app_state
        .identity
        .resend_confirmation_code(email)
        .await
        .map_err(|e| ServerError::Upstream(format!("Resending the code failed: {}", e)))?;

    tracing::debug!(destination = ?delivery.and_then(|d| d.destination), "Code resent");

    Ok(Json(MessageResponse {
        message: "Verification code resent.".to_string(),
    }))
}

/// POST /auth/signin
pub async fn sign_in(
    State(app_state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    let email = check_email(&req.email)?;

    let tokens = app_state
        .identity
        .sign_in(email, &req.password)
        .await
        .map_err(|e| match e {
            IdentityError::NotAuthorized
            | IdentityError::UserNotConfirmed
            | IdentityError::UserNotFound
            | IdentityError::ChallengeRequired(_) => ServerError::Unauthorized(e.to_string()),
            other => ServerError::Upstream(format!("Sign in failed: {}", other)),
        })?;

    let AuthTokens {
        id_token,
        access_token,
        refresh_token,
        expires_in,
        token_type,
    } = tokens;

    let refresh_token = refresh_token.ok_or_else(|| {
        ServerError::Internal("Identity provider returned no refresh token".to_string())
    })?;

    Ok(Json(SignInResponse {
        id_token,
        access_token,
        refresh_token,
        expires_in,
        token_type,
    }))
}

/// POST /auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let tokens = app_state
        .identity
        .refresh(&req.refresh_token)
        .await
        .map_err(|e| {
            tracing::warn!("Token refresh failed: {}", e);
            ServerError::Unauthorized(format!("Token refresh failed: {}", e))
        })?;

    Ok(Json(RefreshResponse {
        id_token: tokens.id_token,
        access_token: tokens.access_token,
        expires_in: tokens.expires_in,
        token_type: tokens.token_type,
    }))
}

/// POST /auth/signout
pub async fn sign_out(
    State(app_state): State<AppState>,
    Json(req): Json<SignOutRequest>,
) -> Result<Json<SignOutResponse>> {
    app_state
        .identity
        .sign_out(&req.access_token)
        .await
        .map_err(|e| ServerError::Upstream(format!("Sign out failed: {}", e)))?;

    Ok(Json(SignOutResponse {
        signed_out: true,
        message: "Signed out successfully.".to_string(),
    }))
}
