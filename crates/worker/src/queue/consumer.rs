//! Job consumer - pull jobs off the queue and run them under a concurrency cap

use super::job::JobFailure;
use crate::config::MAX_CONCURRENCY;
use crate::metrics::WorkerMetrics;
use crate::workers::ModelEvaluator;
use futures::FutureExt;
use modelabs_domain::EvaluationJob;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info};

/// Job consumer for processing queued evaluations
pub struct JobConsumer {
    rx: mpsc::Receiver<EvaluationJob>,
    evaluator: Arc<dyn ModelEvaluator>,
    failures: mpsc::Sender<JobFailure>,
    metrics: WorkerMetrics,
    concurrency: usize,
}

impl JobConsumer {
    pub fn new(
        rx: mpsc::Receiver<EvaluationJob>,
        evaluator: Arc<dyn ModelEvaluator>,
        failures: mpsc::Sender<JobFailure>,
        metrics: WorkerMetrics,
        concurrency: usize,
    ) -> Self {
        Self {
            rx,
            evaluator,
            failures,
            metrics,
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }

    /// Run until every producer is dropped and all in-flight jobs finish
    pub async fn run(mut self) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        info!(
            concurrency = self.concurrency,
            evaluator = self.evaluator.name(),
            "Starting evaluation consumer"
        );

        while let Some(job) = self.rx.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let evaluator = self.evaluator.clone();
            let failures = self.failures.clone();
            let metrics = self.metrics.clone();

            tokio::spawn(async move {
                process_job(job, evaluator, failures, metrics).await;
                drop(permit);
            });
        }

        // Queue closed: wait for in-flight evaluations
        let permits = u32::try_from(self.concurrency).unwrap_or(u32::MAX);
        let _ = semaphore.acquire_many_owned(permits).await;
        info!("Evaluation consumer stopped");
    }
}

async fn process_job(
    job: EvaluationJob,
    evaluator: Arc<dyn ModelEvaluator>,
    failures: mpsc::Sender<JobFailure>,
    metrics: WorkerMetrics,
) {
    debug!(
        job_id = %job.id,
        model_id = %job.record.id,
        partition = job.model_type().partition(),
        "Processing job"
    );

    metrics.increment_jobs_processed();
    let start = Instant::now();

    let result = match AssertUnwindSafe(evaluator.evaluate(&job.record))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => Err(anyhow::anyhow!(
            "evaluator panicked: {}",
            panic_message(panic.as_ref())
        )),
    };

    let duration = start.elapsed();
    metrics.record_job_duration(duration);

    match result {
        Ok(()) => {
            metrics.increment_jobs_succeeded();
            info!(
                job_id = %job.id,
                model_id = %job.record.id,
                duration_ms = duration.as_millis(),
                "Job completed successfully"
            );
        }
        Err(e) => {
            metrics.increment_jobs_failed();
            let failure = JobFailure::new(&job, format!("{:#}", e));

            if let Err(send_error) = failures.try_send(failure) {
                // Channel full or supervisor gone; keep the failure visible
                error!(
                    job_id = %job.id,
                    model_id = %job.record.id,
                    error = %format!("{:#}", e),
                    reason = %send_error,
                    "Job failed and could not be reported"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use modelabs_domain::ModelRecord;

    struct NoopEvaluator;

    #[async_trait]
    impl ModelEvaluator for NoopEvaluator {
        async fn evaluate(&self, _record: &ModelRecord) -> anyhow::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "NoopEvaluator"
        }
    }

    #[tokio::test]
    async fn test_oversized_concurrency_is_clamped() {
        let (tx, rx) = mpsc::channel(1);
        let (failures, _failure_rx) = mpsc::channel(1);
        let consumer = JobConsumer::new(
            rx,
            Arc::new(NoopEvaluator),
            failures,
            WorkerMetrics::new(),
            usize::MAX,
        );
        assert_eq!(consumer.concurrency, MAX_CONCURRENCY);

        drop(tx);
        tokio::time::timeout(std::time::Duration::from_secs(5), consumer.run())
            .await
            .unwrap();
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
