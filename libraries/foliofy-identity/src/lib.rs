//! Foliofy Identity
//!
//! Delegates account management to an AWS Cognito user pool and verifies
//! the bearer tokens it issues.
//!
//! # Architecture
//!
//! - [`CognitoClient`]: talks to the user-pool JSON API (sign-up,
//!   confirmation, sign-in, refresh, sign-out)
//! - [`JwksVerifier`]: checks RS256 tokens against the pool's published keys
//! - [`IdentityProvider`]: the seam the server depends on
//!
//! # Example
//!
//! ```ignore
//! use foliofy_identity::{CognitoClient, CognitoConfig, IdentityProvider};
//!
//! let config = CognitoConfig::new("ap-northeast-1", "ap-northeast-1_AbCdEf", "client-id");
//! let cognito = CognitoClient::new(config)?;
//!
//! let tokens = cognito.sign_in("user@example.com", "Passw0rd!").await?;
//! let claims = cognito.verify_token(&tokens.id_token).await?;
//! println!("signed in as {}", claims.sub);
//! ```

mod cognito;
mod error;
mod jwks;
mod provider;
mod types;

pub use cognito::CognitoClient;
pub use error::{IdentityError, Result};
pub use jwks::JwksVerifier;
pub use provider::IdentityProvider;
pub use types::{AuthTokens, CodeDeliveryDetails, CognitoConfig, SignUpOutcome, TokenClaims};
