//! Foliofy Server Library
//!
//! HTTP API for tracking stock holdings: account management delegated to
//! Cognito, holdings persisted in SQLite, and a dashboard priced with live
//! quotes.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use router::create_router;
pub use services::{DashboardService, HoldingsService};
pub use state::AppState;
