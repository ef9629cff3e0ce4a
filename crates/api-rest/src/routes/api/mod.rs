//! `/api` routes.

use crate::state::AppState;
use axum::Router;

pub mod datasets;
pub mod evaluate;
pub mod rankings;

/// Create all `/api` routes
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(evaluate::routes())
        .merge(rankings::routes())
        .merge(datasets::routes(state.config.upload_body_limit()))
}
