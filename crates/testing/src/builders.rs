//! Fluent builder pattern for constructing test data.

use chrono::{DateTime, Utc};
use modelabs_domain::{
    DatasetId, DatasetRecord, DatasetStatus, DatasetVisibility, ModelId, ModelRecord, ModelType,
};
use std::collections::BTreeMap;

/// Builder for creating ModelRecord test instances
#[derive(Clone)]
pub struct ModelRecordBuilder {
    id: String,
    model_type: ModelType,
    name: Option<String>,
    overall_score: Option<f64>,
    category_scores: BTreeMap<String, f64>,
    updated_at: Option<DateTime<Utc>>,
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl ModelRecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_type: ModelType::LanguageModel,
            name: None,
            overall_score: None,
            category_scores: BTreeMap::new(),
            updated_at: None,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_type(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_overall_score(mut self, score: f64) -> Self {
        self.overall_score = Some(score);
        self.updated_at.get_or_insert_with(Utc::now);
        self
    }

    pub fn with_category_score(mut self, category: impl Into<String>, score: f64) -> Self {
        self.category_scores.insert(category.into(), score);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Panics if the id is empty
    pub fn build(self) -> ModelRecord {
        let id = ModelId::new(self.id).expect("builder id must not be empty");
        let name = self.name.unwrap_or_else(|| id.to_string());

        let mut record = ModelRecord::new(id, self.model_type, name);
        record.overall_score = self.overall_score;
        record.category_scores = self.category_scores;
        record.updated_at = self.updated_at;
        record.metadata = self.metadata;
        record
    }
}

/// Builder for creating DatasetRecord test instances
#[derive(Clone)]
pub struct DatasetRecordBuilder {
    record: DatasetRecord,
}

impl DatasetRecordBuilder {
    pub fn new() -> Self {
        let id = DatasetId::new();
        Self {
            record: DatasetRecord {
                id,
                name: "Test Dataset".to_string(),
                user_id: "user-1".to_string(),
                user_email: Some("user-1@example.com".to_string()),
                file_size: 128,
                file_type: "csv".to_string(),
                uploaded_at: Utc::now(),
                description: String::new(),
                status: DatasetStatus::Ready,
                downloads: 0,
                visibility: DatasetVisibility::Public,
                tags: Vec::new(),
                storage_key: format!("datasets/user-1/{}/data.csv", id),
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    pub fn with_owner(mut self, user_id: impl Into<String>) -> Self {
        self.record.user_id = user_id.into();
        self.record.storage_key = format!(
            "datasets/{}/{}/data.{}",
            self.record.user_id, self.record.id, self.record.file_type
        );
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.record.tags.push(tag.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.record.visibility = DatasetVisibility::Private;
        self
    }

    pub fn uploaded_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.uploaded_at = at;
        self
    }

    pub fn build(self) -> DatasetRecord {
        self.record
    }
}

impl Default for DatasetRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
