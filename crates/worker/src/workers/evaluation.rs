//! Scoring evaluator - score a model, aggregate, write back to its partition

use super::{CategoryScorer, ModelEvaluator};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use modelabs_application::ModelRecordStore;
use modelabs_domain::{ModelRecord, ScoreUpdate};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Evaluator that asks a [`CategoryScorer`] for category scores and stores
/// their two-decimal mean as the overall score.
pub struct ScoringEvaluator<S> {
    scorer: S,
    store: Arc<dyn ModelRecordStore>,
}

impl<S: CategoryScorer> ScoringEvaluator<S> {
    pub fn new(scorer: S, store: Arc<dyn ModelRecordStore>) -> Self {
        Self { scorer, store }
    }
}

#[async_trait]
impl<S: CategoryScorer> ModelEvaluator for ScoringEvaluator<S> {
    async fn evaluate(&self, record: &ModelRecord) -> Result<()> {
        let scores = self
            .scorer
            .score(record)
            .await
            .with_context(|| format!("{} failed for model {}", self.scorer.name(), record.id))?;

        let update = ScoreUpdate::aggregate(scores, Utc::now())
            .with_context(|| format!("invalid scores for model {}", record.id))?;

        self.store
            .save_scores(record.model_type, &record.id, &update)
            .await
            .with_context(|| {
                format!(
                    "failed to store scores in {}/{}",
                    record.model_type.partition(),
                    record.id
                )
            })?;

        info!(
            model_id = %record.id,
            partition = record.model_type.partition(),
            overall_score = update.overall_score,
            "Scores written"
        );

        Ok(())
    }

    fn name(&self) -> &str {
        self.scorer.name()
    }
}

/// Scorer that reuses the category scores already on the record.
///
/// Restricted to the categories of the record's model type, so re-running
/// an evaluation recomputes the overall score from stored inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredScoreScorer;

#[async_trait]
impl CategoryScorer for StoredScoreScorer {
    async fn score(&self, record: &ModelRecord) -> Result<BTreeMap<String, f64>> {
        let scores: BTreeMap<String, f64> = record
            .model_type
            .categories()
            .iter()
            .filter_map(|category| {
                record
                    .category_scores
                    .get(*category)
                    .map(|score| (category.to_string(), *score))
            })
            .collect();

        if scores.is_empty() {
            bail!("model {} has no stored category scores", record.id);
        }

        Ok(scores)
    }

    fn name(&self) -> &str {
        "StoredScoreScorer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelabs_domain::{ModelId, ModelType};
    use modelabs_infrastructure::InMemoryModelStore;

    fn record(id: &str, model_type: ModelType, scores: &[(&str, f64)]) -> ModelRecord {
        let mut record = ModelRecord::new(ModelId::new(id).unwrap(), model_type, id);
        record.category_scores = scores.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        record
    }

    #[tokio::test]
    async fn test_stored_scores_are_reaggregated() {
        let store = Arc::new(InMemoryModelStore::new());
        let record = record(
            "gpt-x",
            ModelType::LanguageModel,
            &[("inference", 80.0), ("coding", 90.0), ("mathematics", 71.0)],
        );
        store.upsert(&record).await.unwrap();

        let evaluator = ScoringEvaluator::new(StoredScoreScorer, store.clone());
        evaluator.evaluate(&record).await.unwrap();

        let stored = store
            .get_by_id(ModelType::LanguageModel, &record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.overall_score, Some(80.33));
        assert!(stored.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_other_partition_categories_ignored() {
        let record = record(
            "vision",
            ModelType::Multimodal,
            &[("visual_recognition", 60.0), ("coding", 10.0)],
        );

        let scores = StoredScoreScorer.score(&record).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["visual_recognition"], 60.0);
    }

    #[tokio::test]
    async fn test_no_scores_fails() {
        let record = record("empty", ModelType::LanguageModel, &[]);
        assert!(StoredScoreScorer.score(&record).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_record_fails() {
        let store = Arc::new(InMemoryModelStore::new());
        let record = record("ghost", ModelType::LanguageModel, &[("coding", 50.0)]);

        let evaluator = ScoringEvaluator::new(StoredScoreScorer, store);
        let err = evaluator.evaluate(&record).await.unwrap_err();
        assert!(format!("{:#}", err).contains("language-models/ghost"));
    }
}
