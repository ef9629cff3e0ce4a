//! Model records and their store partitions.

use crate::errors::{DomainError, DomainResult};
use crate::identifiers::ModelId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label clients use for the language-model partition.
pub const LANGUAGE_MODEL_LABEL: &str = "Large Language";

/// Label clients use for the multimodal partition.
pub const MULTIMODAL_LABEL: &str = "Multimodal";

/// Kind of model, which also decides the store partition holding its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    /// Large language models
    #[serde(rename = "Large Language")]
    LanguageModel,
    /// Multimodal models
    #[serde(rename = "Multimodal")]
    Multimodal,
}

impl ModelType {
    /// All model types, in leaderboard tab order
    pub const ALL: [ModelType; 2] = [ModelType::LanguageModel, ModelType::Multimodal];

    /// Resolve a client-supplied label.
    ///
    /// Only `"Large Language"` selects the language partition; every other
    /// label falls through to the multimodal partition.
    pub fn from_label(label: &str) -> Self {
        if label == LANGUAGE_MODEL_LABEL {
            Self::LanguageModel
        } else {
            Self::Multimodal
        }
    }

    /// Client-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Self::LanguageModel => LANGUAGE_MODEL_LABEL,
            Self::Multimodal => MULTIMODAL_LABEL,
        }
    }

    /// Name of the store partition holding records of this type
    pub fn partition(&self) -> &'static str {
        match self {
            Self::LanguageModel => "language-models",
            Self::Multimodal => "multimodal-models",
        }
    }

    /// Parse a partition name back into a model type
    pub fn from_partition(partition: &str) -> DomainResult<Self> {
        match partition {
            "language-models" => Ok(Self::LanguageModel),
            "multimodal-models" => Ok(Self::Multimodal),
            other => Err(DomainError::UnknownVariant {
                kind: "partition",
                value: other.to_string(),
            }),
        }
    }

    /// Score categories shown on the leaderboard for this type
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::LanguageModel => &[
                "inference",
                "mathematics",
                "coding",
                "knowledge_usage",
                "organization",
            ],
            Self::Multimodal => &[
                "visual_recognition",
                "audio_processing",
                "text_understanding",
                "integration",
            ],
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored document for one model.
///
/// `(id, model_type)` addresses exactly one record. Identity fields are set
/// when the model is registered; only the score fields change afterwards.
///
/// Documents may also carry category scores as top-level fields named after
/// the categories of their type; those are read when `category_scores` is
/// absent or empty. Any other unknown top-level field lands in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModelDocument")]
pub struct ModelRecord {
    /// Document id inside the partition
    pub id: ModelId,
    /// Partition the record lives in
    pub model_type: ModelType,
    /// Display name
    #[serde(rename = "model_name", alias = "name")]
    pub name: String,
    /// Free-form descriptive metadata (provider, parameters, links...)
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Aggregate score written by the last evaluation
    #[serde(default)]
    pub overall_score: Option<f64>,
    /// Per-category scores written by the last evaluation
    #[serde(default)]
    pub category_scores: BTreeMap<String, f64>,
    /// When the scores were last written
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ModelRecord {
    /// Create an unscored record
    pub fn new(id: ModelId, model_type: ModelType, name: impl Into<String>) -> Self {
        Self {
            id,
            model_type,
            name: name.into(),
            metadata: serde_json::Map::new(),
            overall_score: None,
            category_scores: BTreeMap::new(),
            updated_at: None,
        }
    }

    /// Overall score usable for ranking, if the record has a finite one
    pub fn ranking_score(&self) -> Option<f64> {
        self.overall_score.filter(|score| score.is_finite())
    }

    /// Overwrite the score fields with an evaluation result
    pub fn apply_scores(&mut self, update: ScoreUpdate) {
        self.overall_score = Some(update.overall_score);
        self.category_scores = update.category_scores;
        self.updated_at = Some(update.updated_at);
    }
}

/// Wire form of a stored model document
#[derive(Deserialize)]
struct ModelDocument {
    id: ModelId,
    model_type: ModelType,
    #[serde(rename = "model_name", alias = "name")]
    name: String,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    overall_score: Option<f64>,
    #[serde(default)]
    category_scores: BTreeMap<String, f64>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<ModelDocument> for ModelRecord {
    fn from(doc: ModelDocument) -> Self {
        let categories = doc.model_type.categories();
        let mut metadata = doc.metadata;
        let mut top_level = BTreeMap::new();

        for (key, value) in doc.extra {
            match value.as_f64() {
                Some(score) if categories.contains(&key.as_str()) => {
                    top_level.insert(key, score);
                }
                _ => {
                    metadata.entry(key).or_insert(value);
                }
            }
        }

        let category_scores = if doc.category_scores.is_empty() {
            top_level
        } else {
            doc.category_scores
        };

        Self {
            id: doc.id,
            model_type: doc.model_type,
            name: doc.name,
            metadata,
            overall_score: doc.overall_score,
            category_scores,
            updated_at: doc.updated_at,
        }
    }
}

/// Score fields an evaluation writes back to a model record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// Aggregate score
    pub overall_score: f64,
    /// Per-category scores
    pub category_scores: BTreeMap<String, f64>,
    /// Evaluation completion time
    pub updated_at: DateTime<Utc>,
}

impl ScoreUpdate {
    /// Build an update whose overall score is the mean of the category
    /// scores, rounded to two decimals.
    pub fn aggregate(
        category_scores: BTreeMap<String, f64>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if category_scores.is_empty() {
            return Err(DomainError::InvalidScore {
                category: "overall".to_string(),
                value: f64::NAN,
            });
        }

        if let Some((category, value)) = category_scores.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DomainError::InvalidScore {
                category: category.clone(),
                value: *value,
            });
        }

        let mean = category_scores.values().sum::<f64>() / category_scores.len() as f64;
        let overall_score = (mean * 100.0).round() / 100.0;

        Ok(Self {
            overall_score,
            category_scores,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_label_resolution() {
        assert_eq!(ModelType::from_label("Large Language"), ModelType::LanguageModel);
        assert_eq!(ModelType::from_label("Multimodal"), ModelType::Multimodal);
        assert_eq!(ModelType::from_label("anything else"), ModelType::Multimodal);
        assert_eq!(ModelType::from_label("large language"), ModelType::Multimodal);
    }

    #[test]
    fn test_partition_round_trip() {
        for model_type in ModelType::ALL {
            assert_eq!(ModelType::from_partition(model_type.partition()).unwrap(), model_type);
        }
        assert!(ModelType::from_partition("datasets").is_err());
    }

    #[test]
    fn test_record_document_shape() {
        let mut record = ModelRecord::new(
            ModelId::new("m1").unwrap(),
            ModelType::LanguageModel,
            "Model One",
        );
        record.overall_score = Some(81.5);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["model_name"], "Model One");
        assert_eq!(json["model_type"], "Large Language");
        assert_eq!(json["overall_score"], 81.5);
    }

    #[test]
    fn test_top_level_category_scores_are_read() {
        let record: ModelRecord = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "model_type": "Large Language",
            "model_name": "Model One",
            "overall_score": 80.0,
            "coding": 90.0,
            "inference": 70,
            "provider": "acme",
            "visual_recognition": 55.0
        }))
        .unwrap();

        assert_eq!(record.category_scores, scores(&[("coding", 90.0), ("inference", 70.0)]));
        assert_eq!(record.metadata["provider"], "acme");
        // Not a language category, so it stays descriptive metadata
        assert_eq!(record.metadata["visual_recognition"], 55.0);
    }

    #[test]
    fn test_nested_category_scores_win() {
        let record: ModelRecord = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "model_type": "Multimodal",
            "name": "m1",
            "category_scores": {"integration": 61.5},
            "integration": 10.0
        }))
        .unwrap();

        assert_eq!(record.category_scores, scores(&[("integration", 61.5)]));
        assert!(record.metadata.is_empty());
    }

    #[test]
    fn test_ranking_score_ignores_non_finite() {
        let mut record = ModelRecord::new(
            ModelId::new("m1").unwrap(),
            ModelType::Multimodal,
            "m1",
        );
        assert_eq!(record.ranking_score(), None);

        record.overall_score = Some(f64::NAN);
        assert_eq!(record.ranking_score(), None);

        record.overall_score = Some(70.0);
        assert_eq!(record.ranking_score(), Some(70.0));
    }

    #[test]
    fn test_aggregate_rounds_mean() {
        let update = ScoreUpdate::aggregate(
            scores(&[("coding", 80.0), ("mathematics", 75.0), ("inference", 70.1)]),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(update.overall_score, 75.03);
    }

    #[test]
    fn test_aggregate_rejects_empty_and_nan() {
        assert!(ScoreUpdate::aggregate(BTreeMap::new(), Utc::now()).is_err());

        let err = ScoreUpdate::aggregate(scores(&[("coding", f64::NAN)]), Utc::now()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SCORE");
    }

    #[test]
    fn test_apply_scores_overwrites() {
        let mut record = ModelRecord::new(
            ModelId::new("m1").unwrap(),
            ModelType::LanguageModel,
            "m1",
        );
        let at = Utc::now();
        record.apply_scores(ScoreUpdate::aggregate(scores(&[("coding", 90.0)]), at).unwrap());

        assert_eq!(record.overall_score, Some(90.0));
        assert_eq!(record.updated_at, Some(at));
        assert_eq!(record.category_scores.len(), 1);
    }
}
