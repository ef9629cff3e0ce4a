//! Modelabs Evaluation Worker
//!
//! Background evaluation for the Modelabs leaderboard.
//!
//! This crate provides:
//! - A bounded in-process job queue the trigger endpoint enqueues into
//! - A consumer that runs evaluations with a concurrency cap
//! - A failure channel so errors in detached jobs are reported, not lost
//! - Scorers: stored-score re-aggregation and a remote HTTP scoring service
//! - Metrics

pub mod config;
pub mod metrics;
pub mod queue;
pub mod workers;

pub use config::WorkerConfig;
pub use metrics::{MetricsSnapshot, WorkerMetrics};
pub use queue::{JobConsumer, JobFailure, JobProducer};
pub use workers::{
    CategoryScorer, HttpCategoryScorer, ModelEvaluator, ScoringEvaluator, StoredScoreScorer,
};

use anyhow::Result;
use modelabs_application::ModelRecordStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Worker pool for running evaluation jobs
pub struct WorkerPool {
    config: WorkerConfig,
    metrics: WorkerMetrics,
}

impl WorkerPool {
    /// Create a new worker pool
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            metrics: WorkerMetrics::new(),
        }
    }

    /// Build the evaluator the configuration asks for
    pub fn evaluator(&self, store: Arc<dyn ModelRecordStore>) -> Result<Arc<dyn ModelEvaluator>> {
        match &self.config.scoring_service_url {
            Some(url) => {
                let scorer = HttpCategoryScorer::new(url, self.config.scoring_timeout())?;
                info!(endpoint = %scorer.endpoint(), "Using remote scoring service");
                Ok(Arc::new(ScoringEvaluator::new(scorer, store)))
            }
            None => {
                info!("Using stored category scores");
                Ok(Arc::new(ScoringEvaluator::new(StoredScoreScorer, store)))
            }
        }
    }

    /// Spawn the consumer and return the handle used to enqueue jobs.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(self, evaluator: Arc<dyn ModelEvaluator>) -> WorkerHandle {
        info!(
            queue_capacity = self.config.queue_capacity,
            concurrency = self.config.concurrency,
            "Starting worker pool"
        );

        let (producer, rx) = queue::bounded(self.config.queue_capacity, self.metrics.clone());
        let (failure_tx, failure_rx) = mpsc::channel(self.config.failure_channel_capacity.max(1));

        let consumer = JobConsumer::new(
            rx,
            evaluator,
            failure_tx,
            self.metrics.clone(),
            self.config.concurrency,
        );
        let task = tokio::spawn(consumer.run());

        WorkerHandle {
            producer,
            failures: Some(failure_rx),
            metrics: self.metrics,
            task,
        }
    }
}

/// Handle to a running worker pool
pub struct WorkerHandle {
    producer: JobProducer,
    failures: Option<mpsc::Receiver<JobFailure>>,
    metrics: WorkerMetrics,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Producer for enqueuing jobs; clone it into request handlers
    pub fn producer(&self) -> JobProducer {
        self.producer.clone()
    }

    /// Take the failure receiver. Returns `None` after the first call.
    pub fn take_failures(&mut self) -> Option<mpsc::Receiver<JobFailure>> {
        self.failures.take()
    }

    /// Get metrics
    pub fn metrics(&self) -> &WorkerMetrics {
        &self.metrics
    }

    /// Close the queue and wait for in-flight jobs.
    ///
    /// Other clones of the producer keep the queue open; drop them first.
    pub async fn shutdown(self) {
        let WorkerHandle { producer, task, .. } = self;
        drop(producer);

        info!("Shutting down worker pool");
        if let Err(e) = task.await {
            error!(error = %e, "Worker pool task failed");
        }
    }
}

/// Log every reported job failure until all senders are gone
pub async fn log_failures(mut failures: mpsc::Receiver<JobFailure>) {
    while let Some(failure) = failures.recv().await {
        error!(
            job_id = %failure.job_id,
            model_id = %failure.model_id,
            partition = failure.model_type.partition(),
            failed_at = %failure.failed_at,
            error = %failure.error,
            "Evaluation failed"
        );
    }
}
