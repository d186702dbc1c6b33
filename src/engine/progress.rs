use std::collections::BTreeSet;

use thiserror::Error;

use crate::content::ranks::rank_for_score;
use crate::content::{Catalog, Level, Rank};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("unknown level id '{0}'")]
    UnknownLevel(String),
}

// --- Level Status ---

/// One row of the level-selection surface.
#[derive(Clone, Debug)]
pub struct LevelEntry<'a> {
    pub index: usize,
    pub level: &'a Level,
    pub locked: bool,
    pub completed: bool,
    /// The frontier level that has not been completed yet.
    pub current: bool,
}

// --- Completion ---

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub level_id: String,
    pub points: u32,
    pub first_completion: bool,
    /// Index that became selectable because of this completion.
    pub unlocked: Option<usize>,
    pub previous_rank: String,
    pub rank: String,
}

impl CompletionOutcome {
    pub fn rank_changed(&self) -> bool {
        self.previous_rank != self.rank
    }
}

// --- Progress Engine ---

/// Learner progression: how far the frontier has moved, cumulative score, and
/// which levels have been finished at least once. Rank is never stored here;
/// it is derived from score on every read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    frontier_index: usize,
    score: u64,
    completed: BTreeSet<String>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted fields. The frontier is clamped into the catalog.
    pub fn restore<I>(frontier_index: usize, score: u64, completed: I, catalog: &Catalog) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            frontier_index: frontier_index.min(catalog.last_index()),
            score,
            completed: completed.into_iter().collect(),
        }
    }

    pub fn frontier_index(&self) -> usize {
        self.frontier_index
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn is_completed(&self, level_id: &str) -> bool {
        self.completed.contains(level_id)
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        index <= self.frontier_index
    }

    pub fn rank<'r>(&self, ranks: &'r [Rank]) -> &'r Rank {
        rank_for_score(ranks, self.score)
    }

    /// Apply the result of finishing a level.
    ///
    /// Score always accumulates, even for replays. The frontier moves forward by
    /// exactly one only when this is the first completion of the frontier level
    /// and the frontier is not already on the last level.
    pub fn record_completion(
        &mut self,
        catalog: &Catalog,
        ranks: &[Rank],
        level_id: &str,
        points: u32,
    ) -> Result<CompletionOutcome, ProgressError> {
        let position = catalog
            .level_position(level_id)
            .ok_or_else(|| ProgressError::UnknownLevel(level_id.to_string()))?;

        let previous_rank = self.rank(ranks).name.to_string();
        self.score += u64::from(points);

        let first_completion = self.completed.insert(level_id.to_string());

        let mut unlocked = None;
        if first_completion
            && position == self.frontier_index
            && self.frontier_index < catalog.last_index()
        {
            self.frontier_index += 1;
            unlocked = Some(self.frontier_index);
        }

        Ok(CompletionOutcome {
            level_id: level_id.to_string(),
            points,
            first_completion,
            unlocked,
            previous_rank,
            rank: self.rank(ranks).name.to_string(),
        })
    }

    pub fn selectable_levels<'a>(&self, catalog: &'a Catalog) -> Vec<LevelEntry<'a>> {
        catalog
            .levels()
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let completed = self.is_completed(&level.id);
                LevelEntry {
                    index,
                    level: level.as_ref(),
                    locked: !self.is_selectable(index),
                    completed,
                    current: index == self.frontier_index && !completed,
                }
            })
            .collect()
    }

    /// Share of catalog levels completed at least once.
    pub fn completion_ratio(&self, catalog: &Catalog) -> f64 {
        if catalog.is_empty() {
            return 0.0;
        }
        let done = catalog
            .levels()
            .iter()
            .filter(|l| self.is_completed(&l.id))
            .count();
        done as f64 / catalog.len() as f64
    }
}
