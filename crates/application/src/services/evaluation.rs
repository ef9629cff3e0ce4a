//! Evaluation Trigger Service
//!
//! Accepts a request naming a model, resolves the record and hands an
//! evaluation job to the dispatcher without waiting for it to run.

use super::ModelRecordStore;
use crate::{ApplicationError, ApplicationResult, MISSING_PARAMETERS};
use modelabs_domain::{EvaluationJob, EvaluationRequest, JobId, ModelId, ModelType};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Message returned when the requested model has no record
pub const MODEL_NOT_FOUND: &str = "Model not found";

/// Hands evaluation jobs to whatever runs them.
///
/// `dispatch` must not wait for the job to run. Implementations reject with
/// `ServiceUnavailable` when they cannot take the job.
pub trait EvaluationDispatcher: Send + Sync {
    /// Enqueue a job
    fn dispatch(&self, job: EvaluationJob) -> ApplicationResult<()>;
}

/// Receipt for an accepted trigger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationAccepted {
    pub job_id: JobId,
    pub model_id: ModelId,
    pub model_type: ModelType,
}

/// Evaluation trigger service
pub struct EvaluationTriggerService {
    store: Arc<dyn ModelRecordStore>,
    dispatcher: Arc<dyn EvaluationDispatcher>,
}

impl EvaluationTriggerService {
    pub fn new(store: Arc<dyn ModelRecordStore>, dispatcher: Arc<dyn EvaluationDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Validate the request, look up the record and dispatch an evaluation.
    ///
    /// Returns as soon as the job is queued. Nothing about the job's outcome
    /// reaches the caller.
    #[instrument(skip(self, request), fields(model_id = ?request.model_id, model_type = ?request.model_type))]
    pub async fn trigger(&self, request: EvaluationRequest) -> ApplicationResult<EvaluationAccepted> {
        let (model_id, label) = match (request.model_id, request.model_type) {
            (Some(id), Some(label)) if !id.is_empty() && !label.is_empty() => (id, label),
            _ => {
                debug!("Rejecting evaluation request with missing parameters");
                return Err(ApplicationError::InvalidInput(MISSING_PARAMETERS.to_string()));
            }
        };

        let model_id = ModelId::new(model_id)
            .map_err(|_| ApplicationError::InvalidInput(MISSING_PARAMETERS.to_string()))?;
        let model_type = ModelType::from_label(&label);

        let mut record = self
            .store
            .get_by_id(model_type, &model_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(MODEL_NOT_FOUND.to_string()))?;

        // The job writes back to the partition the caller named.
        record.model_type = model_type;

        let job = EvaluationJob::new(record);
        let job_id = job.id;
        self.dispatcher.dispatch(job)?;

        info!(
            job_id = %job_id,
            partition = model_type.partition(),
            "Evaluation dispatched"
        );

        Ok(EvaluationAccepted {
            job_id,
            model_id,
            model_type,
        })
    }
}
