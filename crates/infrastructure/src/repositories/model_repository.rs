//! Model record repository implementation.
//!
//! PostgreSQL-backed document store; one row per `(partition, id)`.

use async_trait::async_trait;
use serde_json::json;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

use modelabs_application::{ApplicationError, ApplicationResult, ModelRecordStore};
use modelabs_domain::{ModelId, ModelRecord, ModelType, ScoreUpdate};

use crate::{Error, Result};

/// PostgreSQL implementation of `ModelRecordStore`.
#[derive(Clone)]
pub struct PgModelStore {
    pool: PgPool,
}

impl PgModelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn decode(model_type: ModelType, row: &sqlx::postgres::PgRow) -> Result<ModelRecord> {
        let Json(mut record): Json<ModelRecord> =
            row.try_get("document").map_err(|e| Error::CorruptDocument {
                key: row
                    .try_get::<String, _>("id")
                    .unwrap_or_else(|_| "<unknown>".to_string()),
                reason: e.to_string(),
            })?;

        // The row's partition is authoritative.
        record.model_type = model_type;
        Ok(record)
    }

    async fn fetch_one(&self, model_type: ModelType, id: &ModelId) -> Result<Option<ModelRecord>> {
        let row = sqlx::query(
            "SELECT id, document FROM model_records WHERE partition = $1 AND id = $2",
        )
        .bind(model_type.partition())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::decode(model_type, &row)).transpose()
    }

    async fn fetch_all(&self, model_type: ModelType) -> Result<Vec<ModelRecord>> {
        let rows = sqlx::query(
            "SELECT id, document FROM model_records WHERE partition = $1 ORDER BY seq",
        )
        .bind(model_type.partition())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| Self::decode(model_type, row)).collect()
    }

    async fn merge_scores(
        &self,
        model_type: ModelType,
        id: &ModelId,
        update: &ScoreUpdate,
    ) -> Result<u64> {
        let patch = json!({
            "overall_score": update.overall_score,
            "category_scores": update.category_scores,
            "updated_at": update.updated_at,
        });

        let result = sqlx::query(
            "UPDATE model_records SET document = document || $3 WHERE partition = $1 AND id = $2",
        )
        .bind(model_type.partition())
        .bind(id.as_str())
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn write(&self, record: &ModelRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO model_records (partition, id, document)
            VALUES ($1, $2, $3)
            ON CONFLICT (partition, id) DO UPDATE SET document = EXCLUDED.document
            "#,
        )
        .bind(record.model_type.partition())
        .bind(record.id.as_str())
        .bind(Json(record))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ModelRecordStore for PgModelStore {
    #[instrument(skip(self), fields(partition = model_type.partition()))]
    async fn get_by_id(
        &self,
        model_type: ModelType,
        id: &ModelId,
    ) -> ApplicationResult<Option<ModelRecord>> {
        Ok(self.fetch_one(model_type, id).await?)
    }

    #[instrument(skip(self), fields(partition = model_type.partition()))]
    async fn list_all(&self, model_type: ModelType) -> ApplicationResult<Vec<ModelRecord>> {
        let records = self.fetch_all(model_type).await?;
        debug!(count = records.len(), "Listed model records");
        Ok(records)
    }

    #[instrument(skip(self, update), fields(partition = model_type.partition()))]
    async fn save_scores(
        &self,
        model_type: ModelType,
        id: &ModelId,
        update: &ScoreUpdate,
    ) -> ApplicationResult<()> {
        if self.merge_scores(model_type, id, update).await? == 0 {
            return Err(ApplicationError::NotFound(format!(
                "{}/{}",
                model_type.partition(),
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, record), fields(model_id = %record.id, partition = record.model_type.partition()))]
    async fn upsert(&self, record: &ModelRecord) -> ApplicationResult<()> {
        Ok(self.write(record).await?)
    }
}
