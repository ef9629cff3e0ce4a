//! Storage module - dataset file storage
//!
//! S3-compatible object storage (AWS S3, MinIO, R2...) for uploaded dataset
//! files, plus an in-memory store for development and tests.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Builder, Credentials, Region},
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;
use indexmap::IndexMap;
use modelabs_application::{ApplicationResult, BlobStore};
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::{Error, Result};

/// S3 storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3-compatible endpoint URL (for MinIO, R2, etc.)
    pub endpoint_url: Option<String>,
    /// AWS region
    pub region: String,
    /// S3 bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Path prefix for all objects
    pub path_prefix: String,
    /// Force path-style access (required for MinIO)
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: "us-east-1".to_string(),
            bucket: "modelabs".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            path_prefix: String::new(),
            force_path_style: false,
        }
    }
}

impl StorageConfig {
    /// Create configuration from environment variables.
    ///
    /// Returns `None` when `S3_BUCKET` is unset.
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok().filter(|b| !b.is_empty())?;

        Some(Self {
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
            region: std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("S3_REGION"))
                .unwrap_or_else(|_| "us-east-1".to_string()),
            bucket,
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            path_prefix: std::env::var("S3_PATH_PREFIX").unwrap_or_default(),
            force_path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

/// S3-compatible blob store.
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    path_prefix: String,
}

impl S3BlobStore {
    /// Create a new S3 blob store.
    #[instrument(skip(config))]
    pub fn new(config: StorageConfig) -> Self {
        info!(bucket = %config.bucket, region = %config.region, "Initializing S3 storage");

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if !config.access_key_id.is_empty() && !config.secret_access_key.is_empty() {
            let credentials = Credentials::new(
                &config.access_key_id,
                &config.secret_access_key,
                None,
                None,
                "environment",
            );
            builder = builder.credentials_provider(credentials);
        }

        if let Some(ref endpoint_url) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket,
            path_prefix: config.path_prefix,
        }
    }

    /// Build the full object key with prefix.
    fn full_key(&self, key: &str) -> String {
        if self.path_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.path_prefix.trim_end_matches('/'), key)
        }
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(Error::Storage(service_error.to_string()))
                }
            }
        }
    }

    async fn delete_object(&self, key: &str) -> Result<bool> {
        if !self.exists(key).await? {
            return Ok(false);
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .send()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(true)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> ApplicationResult<()> {
        self.put_object(key, data, content_type).await?;
        debug!(key = %key, "Object uploaded");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> ApplicationResult<bool> {
        let deleted = self.delete_object(key).await?;
        debug!(key = %key, deleted, "Object delete");
        Ok(deleted)
    }
}

/// Stored object in the in-memory blob store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Process-local blob store
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<IndexMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.read().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> ApplicationResult<()> {
        self.objects.write().insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> ApplicationResult<bool> {
        Ok(self.objects.write().shift_remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_key_prefix() {
        let store = S3BlobStore::new(StorageConfig {
            path_prefix: "uploads/".to_string(),
            ..Default::default()
        });
        assert_eq!(store.full_key("datasets/u/x.csv"), "uploads/datasets/u/x.csv");

        let store = S3BlobStore::new(StorageConfig::default());
        assert_eq!(store.full_key("datasets/u/x.csv"), "datasets/u/x.csv");
    }

    #[tokio::test]
    async fn test_in_memory_put_and_delete() {
        let store = InMemoryBlobStore::new();
        store
            .put("datasets/u1/a.csv", Bytes::from_static(b"a,b\n1,2\n"), Some("text/csv"))
            .await
            .unwrap();

        let blob = store.get("datasets/u1/a.csv").unwrap();
        assert_eq!(blob.content_type.as_deref(), Some("text/csv"));

        assert!(store.delete("datasets/u1/a.csv").await.unwrap());
        assert!(!store.delete("datasets/u1/a.csv").await.unwrap());
        assert!(store.keys().is_empty());
    }
}
