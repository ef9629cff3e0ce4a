//! Application state and dependency injection.
//!
//! Stores and services are built once at startup and handed to handlers
//! through Axum's state extraction.

use crate::config::ApiConfig;
use anyhow::Context;
use modelabs_application::{
    BlobStore, DatasetService, DatasetStore, EvaluationDispatcher, EvaluationTriggerService,
    ModelRecordStore, RankingService,
};
use modelabs_infrastructure::{
    DatabaseConfig, DatabasePool, InMemoryBlobStore, InMemoryDatasetStore, InMemoryModelStore,
    PgDatasetStore, PgModelStore, S3BlobStore,
};
use std::sync::Arc;
use tracing::info;

/// Storage backends shared by the services and the worker pool
#[derive(Clone)]
pub struct Backends {
    /// Model record store
    pub models: Arc<dyn ModelRecordStore>,
    /// Dataset metadata store
    pub datasets: Arc<dyn DatasetStore>,
    /// Dataset file store
    pub blobs: Arc<dyn BlobStore>,
}

impl Backends {
    /// Process-local stores
    pub fn in_memory() -> Self {
        Self {
            models: Arc::new(InMemoryModelStore::new()),
            datasets: Arc::new(InMemoryDatasetStore::new()),
            blobs: Arc::new(InMemoryBlobStore::new()),
        }
    }

    /// Connect the backends the configuration names, falling back to
    /// in-memory stores for anything unset
    pub async fn connect(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut backends = Self::in_memory();

        match &config.database_url {
            Some(url) => {
                let pool = DatabasePool::new(&DatabaseConfig::from_url(url.clone()))
                    .await
                    .context("Failed to connect to database")?;
                pool.ensure_schema()
                    .await
                    .context("Failed to prepare database schema")?;

                backends.models = Arc::new(PgModelStore::new(pool.pool().clone()));
                backends.datasets = Arc::new(PgDatasetStore::new(pool.pool().clone()));
                info!("Using PostgreSQL document store");
            }
            None => info!("DATABASE_URL not set, using in-memory stores"),
        }

        match &config.storage {
            Some(storage) => {
                backends.blobs = Arc::new(S3BlobStore::new(storage.clone()));
            }
            None => info!("S3_BUCKET not set, using in-memory file storage"),
        }

        Ok(backends)
    }
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,

    /// Evaluation trigger service
    pub evaluations: Arc<EvaluationTriggerService>,

    /// Ranking query service
    pub rankings: Arc<RankingService>,

    /// Dataset catalog service
    pub datasets: Arc<DatasetService>,
}

impl AppState {
    /// Build the services over the given backends
    pub fn new(
        config: ApiConfig,
        backends: &Backends,
        dispatcher: Arc<dyn EvaluationDispatcher>,
    ) -> Self {
        let evaluations = EvaluationTriggerService::new(backends.models.clone(), dispatcher);
        let rankings = RankingService::new(backends.models.clone());
        let datasets = DatasetService::new(backends.datasets.clone(), backends.blobs.clone())
            .with_max_upload_bytes(config.max_upload_bytes);

        Self::with_services(config, evaluations, rankings, datasets)
    }

    /// Create state from pre-built services
    pub fn with_services(
        config: ApiConfig,
        evaluations: EvaluationTriggerService,
        rankings: RankingService,
        datasets: DatasetService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            evaluations: Arc::new(evaluations),
            rankings: Arc::new(rankings),
            datasets: Arc::new(datasets),
        }
    }
}
