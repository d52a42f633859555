/// Request-level services behind the protected routes
pub mod dashboard;
pub mod holdings;

pub use dashboard::DashboardService;
pub use holdings::HoldingsService;
