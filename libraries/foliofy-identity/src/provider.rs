//! Identity provider abstraction.

use crate::error::Result;
use crate::types::{AuthTokens, CodeDeliveryDetails, SignUpOutcome, TokenClaims};
use async_trait::async_trait;

/// Account management and token verification, delegated to an external
/// identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account; the email doubles as the username
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome>;

    /// Confirm an account with the code sent by email
    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<()>;

    /// Send the confirmation code again
    async fn resend_confirmation_code(&self, email: &str) -> Result<Option<CodeDeliveryDetails>>;

    /// Exchange credentials for tokens
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens>;

    /// Exchange a refresh token for fresh ID and access tokens
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens>;

    /// Revoke every token of the user owning `access_token`
    async fn sign_out(&self, access_token: &str) -> Result<()>;

    /// Verify a bearer token and return its claims
    async fn verify_token(&self, token: &str) -> Result<TokenClaims>;
}
