/// User domain type
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
///
/// Mirrors an identity-provider account; rows are created lazily on the
/// first authenticated request and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity provider subject
    pub id: UserId,

    /// Email address, when the presented token carried one
    pub email: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
