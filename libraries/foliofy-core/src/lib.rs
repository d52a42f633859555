//! Foliofy Core
//!
//! Domain types, traits, and portfolio arithmetic shared by every Foliofy crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Holding`, `StockQuote`, `Dashboard`
//! - **Core Traits**: `PortfolioStore` (persistence), `PriceSource` (market data)
//! - **Portfolio Logic**: weighted-average merging and dashboard aggregation
//! - **Error Handling**: Unified `FolioError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use foliofy_core::portfolio::Position;
//! use rust_decimal::Decimal;
//!
//! let held = Position::new(Decimal::from(10), Decimal::from(150));
//! let bought = Position::new(Decimal::from(5), Decimal::from(160));
//!
//! let merged = held.merge(bought).unwrap();
//! assert_eq!(merged.shares, Decimal::from(15));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod portfolio;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{FolioError, Result};
pub use storage::PortfolioStore;
pub use traits::PriceSource;

pub use types::{
    CreateHolding, Dashboard, DashboardHolding, Holding, HoldingId, NewHolding, StockQuote,
    UpdateHolding, User, UserId,
};
