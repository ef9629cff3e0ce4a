//! Worker configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on concurrent evaluations
pub const MAX_CONCURRENCY: usize = 1024;

/// Evaluation worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Maximum number of jobs waiting in the queue
    pub queue_capacity: usize,

    /// Maximum number of evaluations running at once
    pub concurrency: usize,

    /// Capacity of the failure channel
    pub failure_channel_capacity: usize,

    /// Interval for logging metrics snapshots (seconds)
    pub metrics_interval_seconds: u64,

    /// Remote scoring service; stored scores are re-aggregated when unset
    pub scoring_service_url: Option<String>,

    /// Timeout for one remote scoring call (seconds)
    pub scoring_timeout_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            concurrency: 4,
            failure_channel_capacity: 256,
            metrics_interval_seconds: 60,
            scoring_service_url: None,
            scoring_timeout_seconds: 120,
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            queue_capacity: std::env::var("EVALUATION_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.queue_capacity),
            concurrency: parse_concurrency(std::env::var("EVALUATION_CONCURRENCY").ok().as_deref())
                .unwrap_or(defaults.concurrency),
            failure_channel_capacity: defaults.failure_channel_capacity,
            metrics_interval_seconds: std::env::var("METRICS_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.metrics_interval_seconds),
            scoring_service_url: std::env::var("SCORING_SERVICE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            scoring_timeout_seconds: std::env::var("SCORING_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.scoring_timeout_seconds),
        }
    }

    /// Get the scoring timeout as Duration
    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring_timeout_seconds)
    }

    /// Get the metrics interval as Duration
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_seconds.max(1))
    }
}

/// Positive concurrency setting, capped at [`MAX_CONCURRENCY`]
fn parse_concurrency(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_CONCURRENCY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_is_capped() {
        assert_eq!(parse_concurrency(Some("8")), Some(8));
        assert_eq!(parse_concurrency(Some("18446744073709551615")), Some(MAX_CONCURRENCY));
        assert_eq!(parse_concurrency(Some("0")), None);
        assert_eq!(parse_concurrency(Some("many")), None);
        assert_eq!(parse_concurrency(None), None);
    }
}
