//! Ranking Query Service
//!
//! Builds leaderboards from the scores already stored on model records.

use super::ModelRecordStore;
use crate::ApplicationResult;
use modelabs_domain::{ModelRecord, ModelType, RankedEntry};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ranking query service.
///
/// Every call re-reads the partition; there is no cache.
pub struct RankingService {
    store: Arc<dyn ModelRecordStore>,
}

impl RankingService {
    pub fn new(store: Arc<dyn ModelRecordStore>) -> Self {
        Self { store }
    }

    /// Leaderboard for one partition, best score first.
    ///
    /// Records without a finite overall score (never evaluated) are not
    /// listed, so the result can be shorter than the partition.
    #[instrument(skip(self), fields(partition = model_type.partition()))]
    pub async fn list_rankings(&self, model_type: ModelType) -> ApplicationResult<Vec<RankedEntry>> {
        let records = self.store.list_all(model_type).await?;
        let total = records.len();
        let entries = rank_records(records);

        debug!(records = total, ranked = entries.len(), "Leaderboard computed");
        Ok(entries)
    }
}

/// Sort records by overall score, descending, and assign dense 1-based ranks.
///
/// Records without a finite overall score are left out. The sort is stable,
/// so tied scores keep their input order and the earlier record gets the
/// better rank.
pub fn rank_records(records: Vec<ModelRecord>) -> Vec<RankedEntry> {
    let mut scored: Vec<(f64, ModelRecord)> = records
        .into_iter()
        .filter_map(|record| record.ranking_score().map(|score| (score, record)))
        .collect();

    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    scored
        .iter()
        .enumerate()
        .map(|(index, (score, record))| RankedEntry::from_record(index as u32 + 1, *score, record))
        .collect()
}
