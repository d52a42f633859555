//! Types for the identity delegate.

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    "ap-northeast-1".to_string()
}

fn default_jwks_refetch_secs() -> u64 {
    60
}

/// User-pool coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct CognitoConfig {
    /// AWS region of the user pool
    #[serde(default = "default_region")]
    pub region: String,

    /// User pool ID (e.g. `ap-northeast-1_AbCdEfGhI`)
    #[serde(default)]
    pub user_pool_id: String,

    /// App client ID; must be a client without a secret
    #[serde(default)]
    pub client_id: String,

    /// Override of the regional endpoint (local emulator, tests)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Minimum seconds between key downloads triggered by an unknown `kid`
    #[serde(default = "default_jwks_refetch_secs")]
    pub jwks_refetch_secs: u64,
}

impl CognitoConfig {
    pub fn new(
        region: impl Into<String>,
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
            endpoint: None,
            jwks_refetch_secs: default_jwks_refetch_secs(),
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the minimum interval between JWKS refetches.
    pub fn with_jwks_refetch_secs(mut self, secs: u64) -> Self {
        self.jwks_refetch_secs = secs;
        self
    }

    /// Base URL of the user-pool API, without trailing slash
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://cognito-idp.{}.amazonaws.com", self.region),
        }
    }

    /// Expected `iss` claim of tokens issued by the pool
    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region, self.user_pool_id
        )
    }

    /// Location of the pool's public signing keys
    pub fn jwks_url(&self) -> String {
        format!(
            "{}/{}/.well-known/jwks.json",
            self.endpoint_url(),
            self.user_pool_id
        )
    }
}

/// Where a confirmation code was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDeliveryDetails {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub delivery_medium: Option<String>,
    #[serde(default)]
    pub attribute_name: Option<String>,
}

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user_sub: String,
    pub user_confirmed: bool,
    pub code_delivery_details: Option<CodeDeliveryDetails>,
}

/// Tokens issued on sign-in or refresh.
///
/// `refresh_token` is absent after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
}

/// Verified claims of an ID or access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Stable user identifier
    pub sub: String,

    /// Only present in ID tokens
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub email_verified: Option<bool>,

    /// `id` or `access`
    #[serde(default)]
    pub token_use: Option<String>,

    /// App client of an ID token
    #[serde(default)]
    pub aud: Option<String>,

    /// App client of an access token
    #[serde(default)]
    pub client_id: Option<String>,

    pub iss: String,
    pub exp: i64,

    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,
}

impl TokenClaims {
    /// App client the token was issued to
    pub fn audience(&self) -> Option<&str> {
        match self.token_use.as_deref() {
            Some("access") => self.client_id.as_deref(),
            Some("id") => self.aud.as_deref(),
            _ => self.aud.as_deref().or(self.client_id.as_deref()),
        }
    }
}
