mod dashboard;
mod holding;
mod ids;
mod quote;
mod user;

pub use dashboard::{Dashboard, DashboardHolding};
pub use holding::{CreateHolding, Holding, NewHolding, UpdateHolding};
pub use ids::{HoldingId, UserId};
pub use quote::StockQuote;
pub use user::User;
