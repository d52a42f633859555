//! User queries

use crate::error::{Result, StorageError};
use chrono::Utc;
use foliofy_core::types::{User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert the user if absent
///
/// An existing row keeps its data, except that a missing email is filled in
/// once a token carrying one shows up.
pub async fn ensure_exists(pool: &SqlitePool, id: &UserId, email: Option<&str>) -> Result<User> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            email = excluded.email,
            updated_at = excluded.updated_at
        WHERE users.email IS NULL AND excluded.email IS NOT NULL
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::debug!(user_id = %id, "User row created or email recorded");
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id.as_str()))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, created_at, updated_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows =
        sqlx::query("SELECT id, email, created_at, updated_at FROM users ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;

    rows.iter().map(user_from_row).collect()
}
