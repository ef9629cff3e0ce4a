//! Bounded evaluation job queue

pub mod consumer;
pub mod job;
pub mod producer;

pub use consumer::JobConsumer;
pub use job::JobFailure;
pub use producer::JobProducer;

use crate::metrics::WorkerMetrics;
use modelabs_domain::EvaluationJob;
use tokio::sync::mpsc;

/// Create a queue holding at most `capacity` waiting jobs.
///
/// The producer side is cheap to clone and is what request handlers hold;
/// the receiver is handed to a [`JobConsumer`].
pub fn bounded(
    capacity: usize,
    metrics: WorkerMetrics,
) -> (JobProducer, mpsc::Receiver<EvaluationJob>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (JobProducer::new(tx, metrics), rx)
}
