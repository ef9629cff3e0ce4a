//! Mock implementations of the store, dispatcher and evaluator ports.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use modelabs_application::{
    ApplicationError, ApplicationResult, BlobStore, DatasetStore, EvaluationDispatcher,
    ModelRecordStore,
};
use modelabs_domain::{
    DatasetId, DatasetRecord, EvaluationJob, ModelId, ModelRecord, ModelType, ScoreUpdate,
};
use modelabs_worker::ModelEvaluator;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Dispatcher that keeps every job it is given
#[derive(Default)]
pub struct RecordingDispatcher {
    jobs: RwLock<Vec<EvaluationJob>>,
    reject: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose queue is always full
    pub fn rejecting() -> Self {
        let dispatcher = Self::default();
        dispatcher.reject.store(true, Ordering::SeqCst);
        dispatcher
    }

    pub fn jobs(&self) -> Vec<EvaluationJob> {
        self.jobs.read().clone()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.read().len()
    }
}

impl EvaluationDispatcher for RecordingDispatcher {
    fn dispatch(&self, job: EvaluationJob) -> ApplicationResult<()> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(ApplicationError::ServiceUnavailable(
                "Evaluation queue is full".to_string(),
            ));
        }
        self.jobs.write().push(job);
        Ok(())
    }
}

/// Model store whose backend is down
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableModelStore;

fn backend_down<T>() -> ApplicationResult<T> {
    Err(ApplicationError::Internal(
        "connection refused: document store at 10.0.0.5:5432".to_string(),
    ))
}

#[async_trait]
impl ModelRecordStore for UnavailableModelStore {
    async fn get_by_id(&self, _: ModelType, _: &ModelId) -> ApplicationResult<Option<ModelRecord>> {
        backend_down()
    }

    async fn list_all(&self, _: ModelType) -> ApplicationResult<Vec<ModelRecord>> {
        backend_down()
    }

    async fn save_scores(&self, _: ModelType, _: &ModelId, _: &ScoreUpdate) -> ApplicationResult<()> {
        backend_down()
    }

    async fn upsert(&self, _: &ModelRecord) -> ApplicationResult<()> {
        backend_down()
    }
}

/// Dataset store that reads as empty and refuses writes
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingDatasetStore;

#[async_trait]
impl DatasetStore for FailingDatasetStore {
    async fn list(&self) -> ApplicationResult<Vec<DatasetRecord>> {
        Ok(Vec::new())
    }

    async fn get(&self, _: &DatasetId) -> ApplicationResult<Option<DatasetRecord>> {
        Ok(None)
    }

    async fn create(&self, _: &DatasetRecord) -> ApplicationResult<()> {
        backend_down()
    }

    async fn delete(&self, _: &DatasetId) -> ApplicationResult<bool> {
        backend_down()
    }
}

/// Blob store that records keys and can be told to fail uploads
#[derive(Default)]
pub struct MockBlobStore {
    objects: RwLock<Vec<(String, Bytes)>>,
    deleted: RwLock<Vec<String>>,
    fail_puts: AtomicBool,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_puts.store(true, Ordering::SeqCst);
        store
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.read().clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, key: &str, data: Bytes, _: Option<&str>) -> ApplicationResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(ApplicationError::Internal("upload failed".to_string()));
        }
        self.objects.write().push((key.to_string(), data));
        Ok(())
    }

    async fn delete(&self, key: &str) -> ApplicationResult<bool> {
        let mut objects = self.objects.write();
        let before = objects.len();
        objects.retain(|(k, _)| k != key);
        self.deleted.write().push(key.to_string());
        Ok(objects.len() < before)
    }
}

/// Evaluator that blocks every job until the test opens the gate
pub struct GatedEvaluator {
    gate: Arc<Semaphore>,
    started: AtomicUsize,
    completed: AtomicUsize,
    evaluated: RwLock<Vec<ModelId>>,
}

impl GatedEvaluator {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            evaluated: RwLock::new(Vec::new()),
        }
    }

    /// Let `n` blocked evaluations finish
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn evaluated(&self) -> Vec<ModelId> {
        self.evaluated.read().clone()
    }
}

impl Default for GatedEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelEvaluator for GatedEvaluator {
    async fn evaluate(&self, record: &ModelRecord) -> Result<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await?.forget();
        self.evaluated.write().push(record.id.clone());
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "GatedEvaluator"
    }
}

/// Evaluator that always fails, by error or by panic
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingEvaluator {
    panic: bool,
}

impl FailingEvaluator {
    pub fn new() -> Self {
        Self { panic: false }
    }

    pub fn panicking() -> Self {
        Self { panic: true }
    }
}

#[async_trait]
impl ModelEvaluator for FailingEvaluator {
    async fn evaluate(&self, record: &ModelRecord) -> Result<()> {
        if self.panic {
            panic!("scorer crashed on {}", record.id);
        }
        Err(anyhow!("benchmark harness unavailable for {}", record.id))
    }

    fn name(&self) -> &str {
        "FailingEvaluator"
    }
}
