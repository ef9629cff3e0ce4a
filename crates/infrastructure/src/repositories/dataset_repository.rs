//! Dataset repository implementation.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use modelabs_application::{ApplicationResult, DatasetStore};
use modelabs_domain::{DatasetId, DatasetRecord};

use crate::{Error, Result};

/// PostgreSQL implementation of `DatasetStore`.
#[derive(Clone)]
pub struct PgDatasetStore {
    pool: PgPool,
}

impl PgDatasetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn decode(row: &sqlx::postgres::PgRow) -> Result<DatasetRecord> {
        let Json(record): Json<DatasetRecord> =
            row.try_get("document").map_err(|e| Error::CorruptDocument {
                key: row
                    .try_get::<uuid::Uuid, _>("id")
                    .map(|id| id.to_string())
                    .unwrap_or_else(|_| "<unknown>".to_string()),
                reason: e.to_string(),
            })?;
        Ok(record)
    }

    async fn fetch_all(&self) -> Result<Vec<DatasetRecord>> {
        let rows = sqlx::query("SELECT id, document FROM datasets ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::decode).collect()
    }

    async fn fetch_one(&self, id: &DatasetId) -> Result<Option<DatasetRecord>> {
        let row = sqlx::query("SELECT id, document FROM datasets WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn insert(&self, record: &DatasetRecord) -> Result<()> {
        sqlx::query("INSERT INTO datasets (id, document) VALUES ($1, $2)")
            .bind(*record.id.as_uuid())
            .bind(Json(record))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &DatasetId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DatasetStore for PgDatasetStore {
    #[instrument(skip(self))]
    async fn list(&self) -> ApplicationResult<Vec<DatasetRecord>> {
        Ok(self.fetch_all().await?)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DatasetId) -> ApplicationResult<Option<DatasetRecord>> {
        Ok(self.fetch_one(id).await?)
    }

    #[instrument(skip(self, record), fields(dataset_id = %record.id))]
    async fn create(&self, record: &DatasetRecord) -> ApplicationResult<()> {
        Ok(self.insert(record).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &DatasetId) -> ApplicationResult<bool> {
        Ok(self.remove(id).await?)
    }
}
