//! Bearer-token verification against the user pool's JWKS.

use crate::error::{IdentityError, Result};
use crate::types::{CognitoConfig, TokenClaims};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Verifies RS256 tokens issued by one user pool for one app client.
///
/// The key set is downloaded on first use and kept for the life of the
/// verifier. A token signed with an unknown `kid` causes a single refetch so
/// rotated keys are picked up, at most once per refetch interval.
pub struct JwksVerifier {
    http: Client,
    jwks_url: String,
    issuer: String,
    client_id: String,
    refetch_interval: Duration,
    keys: RwLock<KeyCache>,
}

#[derive(Default)]
struct KeyCache {
    set: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn key(&self, kid: &str) -> Result<Option<DecodingKey>> {
        match self.set.as_ref().and_then(|set| set.find(kid)) {
            Some(jwk) => Ok(Some(DecodingKey::from_jwk(jwk)?)),
            None => Ok(None),
        }
    }
}

impl JwksVerifier {
    pub fn new(http: Client, config: &CognitoConfig) -> Self {
        Self {
            http,
            jwks_url: config.jwks_url(),
            issuer: config.issuer(),
            client_id: config.client_id.clone(),
            refetch_interval: Duration::from_secs(config.jwks_refetch_secs),
            keys: RwLock::new(KeyCache::default()),
        }
    }

    /// Verify signature, expiry, issuer and app client of a token
    pub async fn verify(&self, token: &str) -> Result<TokenClaims> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("Token header has no kid".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // app client is checked below; ID and access tokens carry it in different claims
        validation.validate_aud = false;

        let claims = decode::<TokenClaims>(token, &key, &validation)?.claims;

        if claims.audience() != Some(self.client_id.as_str()) {
            warn!(sub = %claims.sub, "Token issued for a different app client");
            return Err(IdentityError::InvalidToken(
                "Token was not issued for this client".to_string(),
            ));
        }

        Ok(claims)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey> {
        if let Some(key) = self.keys.read().await.key(kid)? {
            return Ok(key);
        }

        let mut cache = self.keys.write().await;
        // refreshed by another request while we waited for the lock
        if let Some(key) = cache.key(kid)? {
            return Ok(key);
        }

        if let Some(fetched_at) = cache.fetched_at {
            if fetched_at.elapsed() < self.refetch_interval {
                debug!(kid = %kid, "Unknown kid, key set fetched recently");
                return Err(IdentityError::KeyNotFound(kid.to_string()));
            }
        }

        // unknown kid: keys may have rotated
        cache.set = Some(self.fetch_keys().await?);
        cache.fetched_at = Some(Instant::now());

        cache
            .key(kid)?
            .ok_or_else(|| IdentityError::KeyNotFound(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<JwkSet> {
        debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self.http.get(&self.jwks_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Provider {
                code: format!("HTTP {}", status.as_u16()),
                message,
            });
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| IdentityError::ParseError(format!("Failed to parse JWKS: {}", e)))?;

        info!(keys = set.keys.len(), "Loaded signing keys");

        Ok(set)
    }
}
