//! HTTP route handlers.

pub mod api;
pub mod health;

// Re-export for convenience
pub use api::routes as api_routes;
pub use health::routes as health_routes;
