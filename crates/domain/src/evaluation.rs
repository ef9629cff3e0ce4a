//! Evaluation requests and dispatched evaluation jobs.

use crate::identifiers::JobId;
use crate::model::{ModelRecord, ModelType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client request asking for one model to be (re)evaluated.
///
/// Both fields are optional at the wire level so that a missing field can be
/// reported as a request error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    /// Document id of the model
    #[serde(default)]
    pub model_id: Option<String>,
    /// Model type label, e.g. `"Large Language"`
    #[serde(default)]
    pub model_type: Option<String>,
}

impl EvaluationRequest {
    /// Build a request with both fields set
    pub fn new(model_id: impl Into<String>, model_type: impl Into<String>) -> Self {
        Self {
            model_id: Some(model_id.into()),
            model_type: Some(model_type.into()),
        }
    }
}

/// Unit of work handed to the evaluation worker.
///
/// Carries a snapshot of the record taken at trigger time. A job is attempted
/// at most once; there is no persisted job state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationJob {
    /// Job identifier, echoed to the caller on acceptance
    pub id: JobId,
    /// Record snapshot; its `model_type` is the one the caller asked for
    pub record: ModelRecord,
    /// When the job was created
    pub enqueued_at: DateTime<Utc>,
}

impl EvaluationJob {
    /// Create a job for a record snapshot
    pub fn new(record: ModelRecord) -> Self {
        Self {
            id: JobId::new(),
            record,
            enqueued_at: Utc::now(),
        }
    }

    /// Partition the job writes back to
    pub fn model_type(&self) -> ModelType {
        self.record.model_type
    }
}
