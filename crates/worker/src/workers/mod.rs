//! Evaluator implementations

pub mod evaluation;
pub mod scoring_client;

pub use evaluation::{ScoringEvaluator, StoredScoreScorer};
pub use scoring_client::HttpCategoryScorer;

use anyhow::Result;
use async_trait::async_trait;
use modelabs_domain::ModelRecord;
use std::collections::BTreeMap;

/// Runs one evaluation for a model record.
///
/// The record is a snapshot taken when the job was triggered; its
/// `model_type` names the partition results are written to.
#[async_trait]
pub trait ModelEvaluator: Send + Sync {
    /// Evaluate the model and persist the outcome
    async fn evaluate(&self, record: &ModelRecord) -> Result<()>;

    /// Get the evaluator name
    fn name(&self) -> &str;
}

/// Produces per-category scores for a model
#[async_trait]
pub trait CategoryScorer: Send + Sync {
    async fn score(&self, record: &ModelRecord) -> Result<BTreeMap<String, f64>>;

    fn name(&self) -> &str;
}
