//! Error types for the identity delegate.

use thiserror::Error;

/// Errors returned by the identity provider or token verification.
///
/// The named variants mirror the user-pool exception codes callers react to;
/// everything else arrives as [`IdentityError::Provider`].
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("This email address is already registered")]
    UsernameExists,

    #[error("Password does not meet the requirements")]
    InvalidPassword,

    #[error("Invalid input parameters: {0}")]
    InvalidParameter(String),

    #[error("Verification code is incorrect")]
    CodeMismatch,

    #[error("Verification code has expired")]
    ExpiredCode,

    #[error("Incorrect email address or password")]
    NotAuthorized,

    #[error("Email address has not been confirmed")]
    UserNotConfirmed,

    #[error("User not found")]
    UserNotFound,

    /// Sign-in needs an extra step (MFA, new password) this API does not drive
    #[error("Authentication failed: {0} challenge required")]
    ChallengeRequired(String),

    /// Any other user-pool error
    #[error("Identity provider error ({code}): {message}")]
    Provider { code: String, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse provider response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Bearer token is malformed, expired, or not issued for this pool/client
    #[error("Token verification failed: {0}")]
    InvalidToken(String),

    /// No published key matches the token's `kid`
    #[error("Signing key not found: {0}")]
    KeyNotFound(String),

    /// Invalid endpoint configuration
    #[error("Invalid identity provider configuration: {0}")]
    InvalidConfig(String),
}

impl IdentityError {
    /// Classify a user-pool error from its `__type` code and message
    pub fn from_provider(code: &str, message: impl Into<String>) -> Self {
        // `__type` may carry a namespace prefix: "com.amazonaws...#CodeMismatchException"
        let code = code.rsplit('#').next().unwrap_or(code);
        let message = message.into();
        match code {
            "UsernameExistsException" => Self::UsernameExists,
            "InvalidPasswordException" => Self::InvalidPassword,
            "InvalidParameterException" => Self::InvalidParameter(message),
            "CodeMismatchException" => Self::CodeMismatch,
            "ExpiredCodeException" => Self::ExpiredCode,
            "NotAuthorizedException" => Self::NotAuthorized,
            "UserNotConfirmedException" => Self::UserNotConfirmed,
            "UserNotFoundException" => Self::UserNotFound,
            other => Self::Provider {
                code: other.to_string(),
                message,
            },
        }
    }

    /// Whether the token itself was rejected (as opposed to an outage)
    pub fn is_token_rejection(&self) -> bool {
        matches!(self, Self::InvalidToken(_) | Self::KeyNotFound(_))
    }
}

impl From<jsonwebtoken::errors::Error> for IdentityError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}

/// Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;
