//! Leaderboard endpoints.

use crate::{error::ApiResult, state::AppState};
use axum::{extract::State, routing::get, Json, Router};
use modelabs_domain::{ModelType, RankedEntry};

/// Ranking routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/language-model-rankings", get(language_model_rankings))
        .route("/multimodal-model-rankings", get(multimodal_model_rankings))
}

async fn language_model_rankings(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RankedEntry>>> {
    Ok(Json(state.rankings.list_rankings(ModelType::LanguageModel).await?))
}

async fn multimodal_model_rankings(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RankedEntry>>> {
    Ok(Json(state.rankings.list_rankings(ModelType::Multimodal).await?))
}
