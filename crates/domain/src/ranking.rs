//! Leaderboard entries.

use crate::identifiers::ModelId;
use crate::model::ModelRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a leaderboard.
///
/// Derived from a [`ModelRecord`] at query time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based dense rank
    pub rank: u32,
    /// Model document id
    pub model_id: ModelId,
    /// Display name
    pub model_name: String,
    /// Score the leaderboard is ordered by
    pub overall_score: f64,
    /// When the scores were last written
    pub updated_at: Option<DateTime<Utc>>,
    /// Per-category scores, emitted as top-level fields
    #[serde(flatten)]
    pub category_scores: BTreeMap<String, f64>,
}

impl RankedEntry {
    /// Build an entry for a record at the given rank.
    ///
    /// `overall_score` is passed separately because the caller has already
    /// checked it is present and finite.
    pub fn from_record(rank: u32, overall_score: f64, record: &ModelRecord) -> Self {
        Self {
            rank,
            model_id: record.id.clone(),
            model_name: record.name.clone(),
            overall_score,
            updated_at: record.updated_at,
            category_scores: record.category_scores.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelType;

    #[test]
    fn test_category_scores_are_top_level() {
        let mut record = ModelRecord::new(ModelId::new("m1").unwrap(), ModelType::LanguageModel, "Model One");
        record.category_scores.insert("coding".to_string(), 90.0);
        record.category_scores.insert("inference".to_string(), 70.0);

        let json = serde_json::to_value(RankedEntry::from_record(1, 80.0, &record)).unwrap();

        assert_eq!(json["coding"], 90.0);
        assert_eq!(json["inference"], 70.0);
        assert_eq!(json["model_name"], "Model One");
        assert!(json.get("category_scores").is_none());
    }
}
