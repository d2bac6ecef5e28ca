//! HTTP API handlers for raflift-an

pub mod analyze;
pub mod audit;
pub mod health;

pub use analyze::analyze_routes;
pub use audit::audit_routes;
pub use health::health_routes;
