//! Holding queries
//!
//! Every function takes the owning user; a holding that belongs to someone
//! else is indistinguishable from a missing one.

use crate::error::{Result, StorageError};
use chrono::Utc;
use foliofy_core::portfolio::{round_stored, Position};
use foliofy_core::types::{Holding, HoldingId, NewHolding, UpdateHolding, UserId};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::str::FromStr;

// Take the write lock up front; a deferred read-then-write transaction gets
// SQLITE_BUSY instead of waiting when another writer got there first.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

const HOLDING_COLUMNS: &str =
    "id, user_id, symbol, name, shares, avg_cost, created_at, updated_at";

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|_| StorageError::CorruptValue {
        column: column.to_string(),
        value: raw,
    })
}

fn holding_from_row(row: &SqliteRow) -> Result<Holding> {
    Ok(Holding {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        symbol: row.try_get("symbol")?,
        name: row.try_get("name")?,
        shares: decimal_column(row, "shares")?,
        avg_cost: decimal_column(row, "avg_cost")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Get all holdings of a user, oldest first
pub async fn list_for_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Holding>> {
    let rows = sqlx::query(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holdings WHERE user_id = ? ORDER BY created_at, symbol"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(holding_from_row).collect()
}

/// Get a holding by ID
pub async fn get_for_user(
    pool: &SqlitePool,
    id: &HoldingId,
    user_id: &UserId,
) -> Result<Option<Holding>> {
    let row = sqlx::query(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holdings WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(holding_from_row).transpose()
}

/// Get the user's holding for a symbol
pub async fn find_by_symbol(
    pool: &SqlitePool,
    user_id: &UserId,
    symbol: &str,
) -> Result<Option<Holding>> {
    let mut conn = pool.acquire().await?;
    find_by_symbol_on(&mut conn, user_id, symbol).await
}

async fn find_by_symbol_on(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    symbol: &str,
) -> Result<Option<Holding>> {
    let row = sqlx::query(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holdings WHERE user_id = ? AND symbol = ? \
         ORDER BY created_at LIMIT 1"
    ))
    .bind(user_id)
    .bind(symbol)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(holding_from_row).transpose()
}

/// Create a holding, or merge into the user's existing one for the symbol
///
/// The lookup and the write share one `IMMEDIATE` transaction: concurrent
/// purchases of the same symbol queue on the write lock (within the busy
/// timeout) and each one merges into the row the previous one wrote.
pub async fn create_or_merge(pool: &SqlitePool, new: NewHolding) -> Result<Holding> {
    let mut tx = pool.begin_with(BEGIN_WRITE).await?;
    let now = Utc::now();

    let id = match find_by_symbol_on(&mut tx, &new.user_id, &new.symbol).await? {
        Some(existing) => {
            let merged = Position::new(existing.shares, existing.avg_cost)
                .merge(Position::new(new.shares, new.avg_cost))?
                .rounded();

            sqlx::query(
                "UPDATE holdings SET shares = ?, avg_cost = ?, updated_at = ? \
                 WHERE id = ? AND user_id = ?",
            )
            .bind(merged.shares.to_string())
            .bind(merged.avg_cost.to_string())
            .bind(now)
            .bind(&existing.id)
            .bind(&new.user_id)
            .execute(&mut *tx)
            .await?;

            tracing::info!(
                holding_id = %existing.id,
                symbol = %new.symbol,
                shares = %merged.shares,
                avg_cost = %merged.avg_cost,
                "Merged purchase into existing holding"
            );

            existing.id
        }
        None => {
            let id = HoldingId::generate();

            sqlx::query(
                "INSERT INTO holdings (id, user_id, symbol, name, shares, avg_cost, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&new.user_id)
            .bind(&new.symbol)
            .bind(&new.name)
            .bind(round_stored(new.shares).to_string())
            .bind(round_stored(new.avg_cost).to_string())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            tracing::info!(holding_id = %id, symbol = %new.symbol, "Created holding");

            id
        }
    };

    let row = sqlx::query(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holdings WHERE id = ?"
    ))
    .bind(&id)
    .fetch_one(&mut *tx)
    .await?;
    let holding = holding_from_row(&row)?;

    tx.commit().await?;

    Ok(holding)
}

/// Overwrite the provided fields
///
/// Returns `None` when the holding does not exist for this user.
pub async fn update(
    pool: &SqlitePool,
    id: &HoldingId,
    user_id: &UserId,
    update: UpdateHolding,
) -> Result<Option<Holding>> {
    let mut tx = pool.begin_with(BEGIN_WRITE).await?;

    let row = sqlx::query(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holdings WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(existing) = row.as_ref().map(holding_from_row).transpose()? else {
        return Ok(None);
    };

    if update.is_empty() {
        tx.commit().await?;
        return Ok(Some(existing));
    }

    let shares = update.shares.map_or(existing.shares, round_stored);
    let avg_cost = update.avg_cost.map_or(existing.avg_cost, round_stored);
    let now = Utc::now();

    sqlx::query(
        "UPDATE holdings SET shares = ?, avg_cost = ?, updated_at = ? WHERE id = ? AND user_id = ?",
    )
    .bind(shares.to_string())
    .bind(avg_cost.to_string())
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query(&format!(
        "SELECT {HOLDING_COLUMNS} FROM holdings WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    let holding = holding_from_row(&row)?;

    tx.commit().await?;

    tracing::info!(
        holding_id = %id,
        shares = %holding.shares,
        avg_cost = %holding.avg_cost,
        "Updated holding"
    );

    Ok(Some(holding))
}

/// Delete a holding
///
/// Returns `false` when nothing was deleted.
pub async fn delete(pool: &SqlitePool, id: &HoldingId, user_id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM holdings WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
