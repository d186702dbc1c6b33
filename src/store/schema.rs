use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::content::ranks::rank_for_score;
use crate::content::{Catalog, DEFAULT_RANKS, Rank};
use crate::engine::progress::Progress;

pub const SCHEMA_VERSION: u32 = 1;

/// Persisted progression record. `rank` is written for readers of the file
/// but never trusted on load; it is rebuilt from `score`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    pub frontier_index: usize,
    pub score: u64,
    pub completed_level_ids: BTreeSet<String>,
    pub rank: String,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            frontier_index: 0,
            score: 0,
            completed_level_ids: BTreeSet::new(),
            rank: DEFAULT_RANKS[0].name.to_string(),
        }
    }
}

impl ProgressData {
    pub fn from_progress(progress: &Progress, ranks: &[Rank]) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            frontier_index: progress.frontier_index(),
            score: progress.score(),
            completed_level_ids: progress.completed().clone(),
            rank: progress.rank(ranks).name.to_string(),
        }
    }

    pub fn to_progress(&self, catalog: &Catalog) -> Progress {
        Progress::restore(
            self.frontier_index,
            self.score,
            self.completed_level_ids.iter().cloned(),
            catalog,
        )
    }

    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// True when the cached rank name disagrees with the score.
    pub fn rank_is_stale(&self, ranks: &[Rank]) -> bool {
        rank_for_score(ranks, self.score).name != self.rank
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub citedr_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub progress: ProgressData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_fresh_progress() {
        let data = ProgressData::default();
        let fresh = ProgressData::from_progress(&Progress::new(), DEFAULT_RANKS);
        assert_eq!(data, fresh);
        assert_eq!(data.rank, "Candidate");
    }

    #[test]
    fn test_stale_rank_is_detected_and_ignored() {
        let catalog = Catalog::builtin().unwrap();
        let data = ProgressData {
            score: 1300,
            rank: "Candidate".to_string(),
            ..ProgressData::default()
        };
        assert!(data.rank_is_stale(DEFAULT_RANKS));
        let progress = data.to_progress(&catalog);
        assert_eq!(progress.rank(DEFAULT_RANKS).name, "Senior Associate");
    }

    #[test]
    fn test_schema_mismatch_needs_reset() {
        let data = ProgressData {
            schema_version: SCHEMA_VERSION + 1,
            ..ProgressData::default()
        };
        assert!(data.needs_reset());
        assert!(!ProgressData::default().needs_reset());
    }

    #[test]
    fn test_completed_ids_serialize_as_array() {
        let mut data = ProgressData::default();
        data.completed_level_ids.insert("L2".to_string());
        data.completed_level_ids.insert("L1".to_string());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["completed_level_ids"], serde_json::json!(["L1", "L2"]));
    }
}
