//! Job producer - hands evaluation jobs to the queue without waiting

use crate::metrics::WorkerMetrics;
use modelabs_application::{ApplicationError, ApplicationResult, EvaluationDispatcher};
use modelabs_domain::EvaluationJob;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Job producer for enqueuing evaluation jobs
#[derive(Clone)]
pub struct JobProducer {
    tx: mpsc::Sender<EvaluationJob>,
    metrics: WorkerMetrics,
}

impl JobProducer {
    pub(crate) fn new(tx: mpsc::Sender<EvaluationJob>, metrics: WorkerMetrics) -> Self {
        Self { tx, metrics }
    }

    /// Number of jobs that can still be enqueued before the queue is full
    pub fn remaining_capacity(&self) -> usize {
        self.tx.capacity()
    }
}

impl EvaluationDispatcher for JobProducer {
    fn dispatch(&self, job: EvaluationJob) -> ApplicationResult<()> {
        let job_id = job.id;

        match self.tx.try_send(job) {
            Ok(()) => {
                self.metrics.increment_jobs_enqueued();
                debug!(job_id = %job_id, "Job enqueued");
                Ok(())
            }
            Err(TrySendError::Full(job)) => {
                self.metrics.increment_jobs_rejected();
                warn!(job_id = %job_id, model_id = %job.record.id, "Evaluation queue is full");
                Err(ApplicationError::ServiceUnavailable(
                    "Evaluation queue is full".to_string(),
                ))
            }
            Err(TrySendError::Closed(_)) => {
                self.metrics.increment_jobs_rejected();
                warn!(job_id = %job_id, "Evaluation queue is closed");
                Err(ApplicationError::ServiceUnavailable(
                    "Evaluation queue is closed".to_string(),
                ))
            }
        }
    }
}
