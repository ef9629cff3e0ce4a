//! Worker metrics and monitoring

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Worker metrics
#[derive(Clone, Default)]
pub struct WorkerMetrics {
    inner: Arc<RwLock<MetricsInner>>,
}

#[derive(Default)]
struct MetricsInner {
    /// Jobs accepted onto the queue
    jobs_enqueued: u64,
    /// Jobs turned away because the queue was full or closed
    jobs_rejected: u64,
    /// Jobs a worker started
    jobs_processed: u64,
    jobs_succeeded: u64,
    jobs_failed: u64,
    /// Recent job durations
    durations: Vec<Duration>,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub jobs_enqueued: u64,
    pub jobs_rejected: u64,
    pub jobs_processed: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    /// Success rate (0.0 - 1.0)
    pub success_rate: f64,
    pub average_duration: Option<Duration>,
}

impl WorkerMetrics {
    /// Create new metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_jobs_enqueued(&self) {
        self.inner.write().jobs_enqueued += 1;
    }

    pub fn increment_jobs_rejected(&self) {
        self.inner.write().jobs_rejected += 1;
    }

    pub fn increment_jobs_processed(&self) {
        self.inner.write().jobs_processed += 1;
    }

    pub fn increment_jobs_succeeded(&self) {
        self.inner.write().jobs_succeeded += 1;
    }

    pub fn increment_jobs_failed(&self) {
        self.inner.write().jobs_failed += 1;
    }

    /// Record job duration
    pub fn record_job_duration(&self, duration: Duration) {
        let mut inner = self.inner.write();
        inner.durations.push(duration);

        // Keep only last 1000 durations to prevent unbounded growth
        if inner.durations.len() > 1000 {
            inner.durations.drain(0..500);
        }
    }

    /// Take a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.read();

        let success_rate = if inner.jobs_processed == 0 {
            0.0
        } else {
            inner.jobs_succeeded as f64 / inner.jobs_processed as f64
        };

        let average_duration = if inner.durations.is_empty() {
            None
        } else {
            let total: Duration = inner.durations.iter().sum();
            Some(total / inner.durations.len() as u32)
        };

        MetricsSnapshot {
            jobs_enqueued: inner.jobs_enqueued,
            jobs_rejected: inner.jobs_rejected,
            jobs_processed: inner.jobs_processed,
            jobs_succeeded: inner.jobs_succeeded,
            jobs_failed: inner.jobs_failed,
            success_rate,
            average_duration,
        }
    }
}
