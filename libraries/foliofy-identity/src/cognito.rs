//! Cognito user-pool client.
//!
//! Uses the public (unsigned) JSON API: every call is a POST to the regional
//! endpoint with the operation named in `X-Amz-Target`.

use crate::error::{IdentityError, Result};
use crate::jwks::JwksVerifier;
use crate::provider::IdentityProvider;
use crate::types::{AuthTokens, CodeDeliveryDetails, CognitoConfig, SignUpOutcome, TokenClaims};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Client for one user pool and app client.
pub struct CognitoClient {
    http: Client,
    endpoint: String,
    client_id: String,
    verifier: JwksVerifier,
}

impl CognitoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CognitoConfig) -> Result<Self> {
        if config.user_pool_id.is_empty() || config.client_id.is_empty() {
            return Err(IdentityError::InvalidConfig(
                "user_pool_id and client_id are required".into(),
            ));
        }

        let endpoint = config.endpoint_url();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(IdentityError::InvalidConfig(format!(
                "endpoint must start with http:// or https://: {}",
                endpoint
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("Foliofy/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let verifier = JwksVerifier::new(http.clone(), &config);

        Ok(Self {
            http,
            endpoint,
            client_id: config.client_id,
            verifier,
        })
    }

    /// Invoke one user-pool operation.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: serde_json::Value,
    ) -> Result<T> {
        debug!(operation = %operation, "Calling user pool");

        let response = self
            .http
            .post(format!("{}/", self.endpoint))
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            // empty bodies come back from operations without output
            let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
            return serde_json::from_str(text).map_err(|e| {
                IdentityError::ParseError(format!("Failed to parse {} response: {}", operation, e))
            });
        }

        let error: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = error.kind.unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        let message = error.message.unwrap_or(text);

        warn!(
            operation = %operation,
            code = %code,
            status = %status,
            "User pool rejected request"
        );

        Err(IdentityError::from_provider(&code, message))
    }
}

#[async_trait]
impl IdentityProvider for CognitoClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let response: SignUpResponse = self
            .call(
                "SignUp",
                json!({
                    "ClientId": self.client_id,
                    "Username": email,
                    "Password": password,
                    "UserAttributes": [{ "Name": "email", "Value": email }],
                }),
            )
            .await?;

        info!(
            user_sub = %response.user_sub,
            confirmed = response.user_confirmed,
            "User signed up"
        );

        Ok(SignUpOutcome {
            user_sub: response.user_sub,
            user_confirmed: response.user_confirmed,
            code_delivery_details: response.code_delivery_details,
        })
    }

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "ConfirmSignUp",
                json!({
                    "ClientId": self.client_id,
                    "Username": email,
                    "ConfirmationCode": code,
                }),
            )
            .await?;

        info!("Sign-up confirmed");
        Ok(())
    }

    async fn resend_confirmation_code(&self, email: &str) -> Result<Option<CodeDeliveryDetails>> {
        let response: ResendResponse = self
            .call(
                "ResendConfirmationCode",
                json!({ "ClientId": self.client_id, "Username": email }),
            )
            .await?;

        Ok(response.code_delivery_details)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "USER_PASSWORD_AUTH",
                    "ClientId": self.client_id,
                    "AuthParameters": { "USERNAME": email, "PASSWORD": password },
                }),
            )
            .await?;

        let tokens = response.into_tokens()?;
        info!("User signed in");
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens> {
        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "REFRESH_TOKEN_AUTH",
                    "ClientId": self.client_id,
                    "AuthParameters": { "REFRESH_TOKEN": refresh_token },
                }),
            )
            .await?;

        let mut tokens = response.into_tokens()?;
        tokens.refresh_token = None;
        Ok(tokens)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call("GlobalSignOut", json!({ "AccessToken": access_token }))
            .await?;

        info!("User signed out");
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<TokenClaims> {
        self.verifier.verify(token).await
    }
}

// ===== Wire models =====

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    user_sub: String,
    user_confirmed: bool,
    #[serde(default)]
    code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResendResponse {
    #[serde(default)]
    code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    token_type: String,
}

impl InitiateAuthResponse {
    fn into_tokens(self) -> Result<AuthTokens> {
        match self.authentication_result {
            Some(result) => Ok(AuthTokens {
                id_token: result.id_token,
                access_token: result.access_token,
                refresh_token: result.refresh_token,
                expires_in: result.expires_in,
                token_type: result.token_type,
            }),
            None => Err(IdentityError::ChallengeRequired(
                self.challenge_name.unwrap_or_else(|| "unknown".to_string()),
            )),
        }
    }
}
