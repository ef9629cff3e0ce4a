//! Evaluation trigger endpoint.

use crate::{error::ApiResult, extractors::ApiJson, state::AppState};
use axum::{extract::State, routing::post, Json, Router};
use modelabs_domain::{EvaluationRequest, JobId, ModelId, ModelType};
use serde::{Deserialize, Serialize};

/// Body returned once the job is queued
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationStarted {
    /// Always "Evaluation started"
    pub message: String,
    /// Id of the queued job
    pub job_id: JobId,
    /// Model being evaluated
    pub model_id: ModelId,
    /// Partition the scores are written to
    pub model_type: ModelType,
}

/// Evaluation routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/evaluate", post(evaluate))
}

/// Queue an evaluation and return without waiting for it
async fn evaluate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EvaluationRequest>,
) -> ApiResult<Json<EvaluationStarted>> {
    let accepted = state.evaluations.trigger(request).await?;

    Ok(Json(EvaluationStarted {
        message: "Evaluation started".to_string(),
        job_id: accepted.job_id,
        model_id: accepted.model_id,
        model_type: accepted.model_type,
    }))
}
