//! Dataset Catalog Service
//!
//! Upload, listing and deletion of dataset files and their metadata records.

use crate::validation::DatasetMetadata;
use crate::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use modelabs_domain::dataset::dataset_file_type;
use modelabs_domain::{DatasetId, DatasetRecord, DatasetStatus, DatasetVisibility};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Default upload limit: 100 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Message returned when a dataset id is unknown
pub const DATASET_NOT_FOUND: &str = "Dataset not found";

/// Dataset metadata store
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// All records, in insertion order
    async fn list(&self) -> ApplicationResult<Vec<DatasetRecord>>;
    async fn get(&self, id: &DatasetId) -> ApplicationResult<Option<DatasetRecord>>;
    async fn create(&self, record: &DatasetRecord) -> ApplicationResult<()>;
    /// Returns whether a record was removed
    async fn delete(&self, id: &DatasetId) -> ApplicationResult<bool>;
}

/// Blob storage for uploaded dataset files
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> ApplicationResult<()>;

    /// Remove the object; returns whether it existed
    async fn delete(&self, key: &str) -> ApplicationResult<bool>;
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct DatasetFilter {
    /// Case-insensitive match against name and description
    pub search: Option<String>,
    /// Only datasets carrying this tag
    pub tag: Option<String>,
    /// Requesting user; private datasets are listed only for their owner
    pub user_id: Option<String>,
}

/// One file upload with its metadata fields
#[derive(Debug, Clone, Default)]
pub struct DatasetUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    /// Display name; defaults to the file name
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub visibility: DatasetVisibility,
}

/// Dataset catalog service
pub struct DatasetService {
    store: Arc<dyn DatasetStore>,
    blobs: Arc<dyn BlobStore>,
    max_upload_bytes: u64,
}

impl DatasetService {
    pub fn new(store: Arc<dyn DatasetStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            blobs,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the upload size limit
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// List datasets, newest upload first
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &DatasetFilter) -> ApplicationResult<Vec<DatasetRecord>> {
        let mut datasets: Vec<DatasetRecord> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|d| {
                d.visibility == DatasetVisibility::Public
                    || filter.user_id.as_deref() == Some(d.user_id.as_str())
            })
            .filter(|d| filter.search.as_deref().map_or(true, |q| d.matches_search(q)))
            .filter(|d| filter.tag.as_deref().map_or(true, |t| d.has_tag(t)))
            .collect();

        datasets.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(datasets)
    }

    pub async fn get(&self, id: &DatasetId) -> ApplicationResult<DatasetRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(DATASET_NOT_FOUND.to_string()))
    }

    /// Store the file, then record its metadata.
    ///
    /// If the metadata write fails the stored file is removed again.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.data.len()))]
    pub async fn upload(&self, upload: DatasetUpload) -> ApplicationResult<DatasetRecord> {
        let user_id = upload
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApplicationError::InvalidInput("Missing user id".to_string()))?;

        let file_name = base_name(&upload.file_name);
        if file_name.is_empty() {
            return Err(ApplicationError::InvalidInput("Missing file".to_string()));
        }

        let file_size = upload.data.len() as u64;
        if file_size == 0 {
            return Err(ApplicationError::InvalidInput("File is empty".to_string()));
        }
        if file_size > self.max_upload_bytes {
            return Err(ApplicationError::PayloadTooLarge(format!(
                "File size must be less than {}MB",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        let file_type = dataset_file_type(&file_name).ok_or_else(|| {
            ApplicationError::InvalidInput(
                "Unsupported file type; expected json, csv, txt or jsonl".to_string(),
            )
        })?;

        let metadata = DatasetMetadata {
            name: upload.name.unwrap_or_else(|| file_name.clone()),
            description: upload.description.unwrap_or_default(),
            tags: upload.tags,
            user_email: upload.user_email,
        };
        metadata.ensure_valid()?;

        let id = DatasetId::new();
        let storage_key = format!("datasets/{}/{}/{}", user_id.replace('/', "_"), id, file_name);

        self.blobs
            .put(&storage_key, upload.data, upload.content_type.as_deref())
            .await?;

        let record = DatasetRecord {
            id,
            name: metadata.name,
            user_id,
            user_email: metadata.user_email,
            file_size,
            file_type,
            uploaded_at: Utc::now(),
            description: metadata.description,
            status: DatasetStatus::Ready,
            downloads: 0,
            visibility: upload.visibility,
            tags: metadata.tags,
            storage_key,
        };

        if let Err(e) = self.store.create(&record).await {
            warn!(dataset_id = %id, error = %e, "Metadata write failed, removing uploaded file");
            if let Err(cleanup) = self.blobs.delete(&record.storage_key).await {
                warn!(dataset_id = %id, error = %cleanup, "Failed to remove orphaned file");
            }
            return Err(e);
        }

        info!(dataset_id = %id, key = %record.storage_key, "Dataset uploaded");
        Ok(record)
    }

    /// Remove the file and then the record
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &DatasetId) -> ApplicationResult<()> {
        let record = self.get(id).await?;

        if !self.blobs.delete(&record.storage_key).await? {
            warn!(dataset_id = %id, key = %record.storage_key, "Dataset file was already missing");
        }

        if !self.store.delete(id).await? {
            return Err(ApplicationError::NotFound(DATASET_NOT_FOUND.to_string()));
        }

        info!(dataset_id = %id, "Dataset deleted");
        Ok(())
    }
}

/// Last path component of a client-supplied file name
fn base_name(file_name: &str) -> String {
    file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
