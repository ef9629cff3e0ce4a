//! In-memory stores
//!
//! Process-local stores used when no database is configured, and by tests.
//! Iteration follows insertion order, which is the stable order ranking
//! relies on for ties.

use async_trait::async_trait;
use indexmap::IndexMap;
use modelabs_application::{ApplicationError, ApplicationResult, DatasetStore, ModelRecordStore};
use modelabs_domain::{DatasetId, DatasetRecord, ModelId, ModelRecord, ModelType, ScoreUpdate};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Model records keyed by partition, then id
#[derive(Debug, Default)]
pub struct InMemoryModelStore {
    partitions: RwLock<HashMap<ModelType, IndexMap<ModelId, ModelRecord>>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with records
    pub fn with_records(records: impl IntoIterator<Item = ModelRecord>) -> Self {
        let store = Self::new();
        {
            let mut partitions = store.partitions.write();
            for record in records {
                partitions
                    .entry(record.model_type)
                    .or_default()
                    .insert(record.id.clone(), record);
            }
        }
        store
    }

    /// Number of records in a partition
    pub fn len(&self, model_type: ModelType) -> usize {
        self.partitions
            .read()
            .get(&model_type)
            .map_or(0, IndexMap::len)
    }
}

#[async_trait]
impl ModelRecordStore for InMemoryModelStore {
    async fn get_by_id(
        &self,
        model_type: ModelType,
        id: &ModelId,
    ) -> ApplicationResult<Option<ModelRecord>> {
        Ok(self
            .partitions
            .read()
            .get(&model_type)
            .and_then(|partition| partition.get(id))
            .cloned())
    }

    async fn list_all(&self, model_type: ModelType) -> ApplicationResult<Vec<ModelRecord>> {
        Ok(self
            .partitions
            .read()
            .get(&model_type)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_scores(
        &self,
        model_type: ModelType,
        id: &ModelId,
        update: &ScoreUpdate,
    ) -> ApplicationResult<()> {
        let mut partitions = self.partitions.write();
        let record = partitions
            .get_mut(&model_type)
            .and_then(|partition| partition.get_mut(id))
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("{}/{}", model_type.partition(), id))
            })?;

        record.apply_scores(update.clone());
        Ok(())
    }

    async fn upsert(&self, record: &ModelRecord) -> ApplicationResult<()> {
        self.partitions
            .write()
            .entry(record.model_type)
            .or_default()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }
}

/// Dataset records in upload order
#[derive(Debug, Default)]
pub struct InMemoryDatasetStore {
    records: RwLock<IndexMap<DatasetId, DatasetRecord>>,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DatasetStore for InMemoryDatasetStore {
    async fn list(&self) -> ApplicationResult<Vec<DatasetRecord>> {
        Ok(self.records.read().values().cloned().collect())
    }

    async fn get(&self, id: &DatasetId) -> ApplicationResult<Option<DatasetRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn create(&self, record: &DatasetRecord) -> ApplicationResult<()> {
        let mut records = self.records.write();
        if records.contains_key(&record.id) {
            return Err(ApplicationError::Internal(format!(
                "dataset {} already exists",
                record.id
            )));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn delete(&self, id: &DatasetId) -> ApplicationResult<bool> {
        Ok(self.records.write().shift_remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn record(id: &str, model_type: ModelType) -> ModelRecord {
        ModelRecord::new(ModelId::new(id).unwrap(), model_type, id)
    }

    #[tokio::test]
    async fn test_partitions_are_separate() {
        let store = InMemoryModelStore::with_records(vec![
            record("shared", ModelType::LanguageModel),
            record("vision", ModelType::Multimodal),
        ]);

        let id = ModelId::new("shared").unwrap();
        assert!(store.get_by_id(ModelType::LanguageModel, &id).await.unwrap().is_some());
        assert!(store.get_by_id(ModelType::Multimodal, &id).await.unwrap().is_none());
        assert_eq!(store.len(ModelType::Multimodal), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryModelStore::new();
        for id in ["c", "a", "b"] {
            store.upsert(&record(id, ModelType::LanguageModel)).await.unwrap();
        }
        // Re-upserting keeps the original position
        store.upsert(&record("c", ModelType::LanguageModel)).await.unwrap();

        let ids: Vec<String> = store
            .list_all(ModelType::LanguageModel)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_save_scores_missing_record() {
        let store = InMemoryModelStore::new();
        let update = ScoreUpdate::aggregate(
            BTreeMap::from([("coding".to_string(), 50.0)]),
            Utc::now(),
        )
        .unwrap();

        let err = store
            .save_scores(ModelType::LanguageModel, &ModelId::new("nope").unwrap(), &update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
