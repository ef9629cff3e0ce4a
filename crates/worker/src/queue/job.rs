//! Job outcome types

use chrono::{DateTime, Utc};
use modelabs_domain::{EvaluationJob, JobId, ModelId, ModelType};
use serde::{Deserialize, Serialize};

/// Report of one evaluation that did not complete.
///
/// Sent on the pool's failure channel; the HTTP caller that triggered the
/// job never sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFailure {
    pub job_id: JobId,
    pub model_id: ModelId,
    pub model_type: ModelType,
    /// Error chain rendered as text
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

impl JobFailure {
    pub fn new(job: &EvaluationJob, error: impl Into<String>) -> Self {
        Self {
            job_id: job.id,
            model_id: job.record.id.clone(),
            model_type: job.record.model_type,
            error: error.into(),
            failed_at: Utc::now(),
        }
    }
}
