//! Application Services
//!
//! Business logic orchestration layer. Each service receives its
//! collaborators as explicitly constructed handles; nothing here reaches for
//! process-wide state.

mod dataset;
mod evaluation;
mod ranking;

pub use dataset::*;
pub use evaluation::*;
pub use ranking::*;

use crate::ApplicationResult;
use async_trait::async_trait;
use modelabs_domain::{ModelId, ModelRecord, ModelType, ScoreUpdate};

/// Model record store, partitioned by model type.
///
/// `list_all` must return records in a stable store order; the ranking
/// service uses that order to break score ties.
#[async_trait]
pub trait ModelRecordStore: Send + Sync {
    /// Fetch one record from a partition
    async fn get_by_id(
        &self,
        model_type: ModelType,
        id: &ModelId,
    ) -> ApplicationResult<Option<ModelRecord>>;

    /// Read every record of a partition
    async fn list_all(&self, model_type: ModelType) -> ApplicationResult<Vec<ModelRecord>>;

    /// Overwrite the score fields of a record.
    ///
    /// Fails with `NotFound` when the record no longer exists.
    async fn save_scores(
        &self,
        model_type: ModelType,
        id: &ModelId,
        update: &ScoreUpdate,
    ) -> ApplicationResult<()>;

    /// Insert or replace a whole record (model registration)
    async fn upsert(&self, record: &ModelRecord) -> ApplicationResult<()>;
}
