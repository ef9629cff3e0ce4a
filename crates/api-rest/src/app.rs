//! Application builder and configuration.
//!
//! Assembles routes, middleware and state into an Axum router.

use crate::{
    config::ApiConfig,
    middleware::{logging_middleware, request_id_middleware},
    routes,
    state::AppState,
};
use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> anyhow::Result<Router> {
    let cors = build_cors_layer(&state.config)?;
    let timeout = state.config.request_timeout();

    let app = Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api::routes(&state))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(timeout))
                .layer(middleware::from_fn(logging_middleware)),
        );

    Ok(app)
}

/// Initialize tracing/logging
pub fn init_tracing(config: &ApiConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.context("Failed to install tracing subscriber")
}

/// CORS for the configured frontend origin, with credentials
fn build_cors_layer(config: &ApiConfig) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(&config.frontend_url)
        .with_context(|| format!("Invalid FRONTEND_URL: {}", config.frontend_url))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
