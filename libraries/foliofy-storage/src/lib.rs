//! Foliofy Storage
//!
//! `SQLite` persistence for users and their holdings.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each entity owns its own queries (`users`, `holdings`)
//! - **Exact Decimals**: share counts and costs are stored as decimal text
//! - **User Scoping**: every holding query is filtered by owner
//!
//! # Example
//!
//! ```rust,no_run
//! use foliofy_storage::{SqliteStore, create_pool, run_migrations};
//! use foliofy_core::{PortfolioStore, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://foliofy.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! let holdings = store.list_holdings(&UserId::new("user-sub")).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod holdings;
pub mod users;

pub use context::SqliteStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://foliofy.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}
