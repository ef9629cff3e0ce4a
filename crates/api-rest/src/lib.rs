//! Modelabs REST API
//!
//! Axum HTTP surface for the Modelabs leaderboard: evaluation triggers,
//! leaderboard queries and the dataset catalog.
//!
//! ## Architecture
//!
//! - **app**: Router assembly, CORS and tracing setup
//! - **routes**: HTTP route handlers
//! - **middleware**: Request id and request logging
//! - **extractors**: Custom Axum extractors
//! - **error**: HTTP error handling and conversion
//! - **state**: Backends and services shared by handlers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use modelabs_api_rest::{create_app, state::Backends, ApiConfig, AppState};
//! use modelabs_worker::WorkerPool;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ApiConfig::from_env()?;
//!     let backends = Backends::in_memory();
//!
//!     let pool = WorkerPool::new(config.worker.clone());
//!     let evaluator = pool.evaluator(backends.models.clone())?;
//!     let workers = pool.start(evaluator);
//!
//!     let state = AppState::new(config, &backends, Arc::new(workers.producer()));
//!     let app = create_app(state)?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::{create_app, init_tracing};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Backends};
