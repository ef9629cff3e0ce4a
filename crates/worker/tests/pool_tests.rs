//! Worker pool integration tests
//!
//! Concurrency cap, failure reporting and drain on shutdown.

use modelabs_application::{EvaluationDispatcher, ModelRecordStore};
use modelabs_domain::{EvaluationJob, ModelType};
use modelabs_infrastructure::InMemoryModelStore;
use modelabs_testing::{fixtures::*, mocks::*, ModelRecordBuilder};
use modelabs_worker::{JobFailure, StoredScoreScorer, ScoringEvaluator, WorkerConfig, WorkerPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn config(queue_capacity: usize, concurrency: usize) -> WorkerConfig {
    WorkerConfig {
        queue_capacity,
        concurrency,
        ..Default::default()
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_concurrency_is_capped() {
    let evaluator = Arc::new(GatedEvaluator::new());
    let handle = WorkerPool::new(config(16, 2)).start(evaluator.clone());
    let producer = handle.producer();

    for record in language_model_records() {
        producer.dispatch(EvaluationJob::new(record)).unwrap();
    }

    wait_until(|| evaluator.started() == 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(evaluator.started(), 2);

    evaluator.release(4);
    wait_until(|| evaluator.completed() == 4).await;

    let snapshot = handle.metrics().snapshot();
    assert_eq!(snapshot.jobs_enqueued, 4);
    assert_eq!(snapshot.jobs_succeeded, 4);

    drop(producer);
    handle.shutdown().await;
}

#[tokio::test]
async fn test_failures_are_reported() {
    let mut handle = WorkerPool::new(config(8, 2)).start(Arc::new(FailingEvaluator::new()));
    let mut failures = handle.take_failures().unwrap();
    assert!(handle.take_failures().is_none());

    let record = ModelRecordBuilder::new("broken").build();
    let job = EvaluationJob::new(record);
    let job_id = job.id;
    handle.producer().dispatch(job).unwrap();

    let failure: JobFailure = timeout(Duration::from_secs(5), failures.recv())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(failure.job_id, job_id);
    assert_eq!(failure.model_id.as_str(), "broken");
    assert_eq!(failure.model_type, ModelType::LanguageModel);
    assert!(failure.error.contains("benchmark harness unavailable"));

    handle.shutdown().await;
}

#[tokio::test]
async fn test_panics_are_reported_and_pool_survives() {
    let mut handle = WorkerPool::new(config(8, 1)).start(Arc::new(FailingEvaluator::panicking()));
    let mut failures = handle.take_failures().unwrap();
    let producer = handle.producer();

    for id in ["p1", "p2"] {
        producer
            .dispatch(EvaluationJob::new(ModelRecordBuilder::new(id).build()))
            .unwrap();
    }

    for expected in ["p1", "p2"] {
        let failure = timeout(Duration::from_secs(5), failures.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failure.model_id.as_str(), expected);
        assert!(failure.error.contains("evaluator panicked"));
    }

    assert_eq!(handle.metrics().snapshot().jobs_failed, 2);
    drop(producer);
    handle.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_jobs() {
    let evaluator = Arc::new(GatedEvaluator::new());
    let handle = WorkerPool::new(config(8, 2)).start(evaluator.clone());

    for record in language_model_records().into_iter().take(3) {
        handle.producer().dispatch(EvaluationJob::new(record)).unwrap();
    }
    wait_until(|| evaluator.started() == 2).await;

    evaluator.release(3);
    timeout(Duration::from_secs(5), handle.shutdown()).await.unwrap();

    assert_eq!(evaluator.completed(), 3);
}

#[tokio::test]
async fn test_stored_score_evaluation_end_to_end() {
    let store = Arc::new(InMemoryModelStore::new());
    let record = ModelRecordBuilder::new("m1")
        .with_category_score("inference", 70.0)
        .with_category_score("coding", 75.5)
        .build();
    store.upsert(&record).await.unwrap();

    let evaluator = Arc::new(ScoringEvaluator::new(StoredScoreScorer, store.clone()));
    let handle = WorkerPool::new(config(4, 1)).start(evaluator);
    handle.producer().dispatch(EvaluationJob::new(record.clone())).unwrap();

    wait_until(|| handle.metrics().snapshot().jobs_succeeded == 1).await;

    let stored = store
        .get_by_id(ModelType::LanguageModel, &record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.overall_score, Some(72.75));

    handle.shutdown().await;
}
