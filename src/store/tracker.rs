use crate::content::{Catalog, Rank};
use crate::engine::progress::{CompletionOutcome, Progress, ProgressError};
use crate::store::schema::ProgressData;
use crate::store::{PROGRESS_KEY, ProgressStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// The write failed. The in-memory record is still authoritative.
    Failed(String),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recorded {
    pub outcome: CompletionOutcome,
    pub saved: SaveStatus,
}

/// Progress engine bound to a store: every mutation is followed by a
/// synchronous save of the full record.
pub struct ProgressTracker<S: ProgressStore> {
    store: S,
    progress: Progress,
    ranks: &'static [Rank],
}

impl<S: ProgressStore> ProgressTracker<S> {
    /// Read the stored record, falling back to a fresh one when it is
    /// missing, unreadable, or from another schema version.
    pub fn load(store: S, catalog: &Catalog, ranks: &'static [Rank]) -> Self {
        let progress = read_progress(&store, catalog, ranks);
        Self {
            store,
            progress,
            ranks,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ranks(&self) -> &'static [Rank] {
        self.ranks
    }

    pub fn rank(&self) -> &'static Rank {
        self.progress.rank(self.ranks)
    }

    pub fn snapshot(&self) -> ProgressData {
        ProgressData::from_progress(&self.progress, self.ranks)
    }

    pub fn record_completion(
        &mut self,
        catalog: &Catalog,
        level_id: &str,
        points: u32,
    ) -> Result<Recorded, ProgressError> {
        let outcome = self
            .progress
            .record_completion(catalog, self.ranks, level_id, points)?;
        tracing::info!(
            level = %outcome.level_id,
            points,
            score = self.progress.score(),
            frontier = self.progress.frontier_index(),
            rank = %outcome.rank,
            "completion recorded"
        );
        let saved = self.persist();
        Ok(Recorded { outcome, saved })
    }

    /// Discard all progression and persist the initial record.
    pub fn reset(&mut self) -> SaveStatus {
        self.progress = Progress::new();
        tracing::info!("progress reset");
        self.persist()
    }

    /// Re-read the store, e.g. after an import replaced the record.
    pub fn reload(&mut self, catalog: &Catalog) {
        self.progress = read_progress(&self.store, catalog, self.ranks);
    }

    fn persist(&self) -> SaveStatus {
        match self.store.save(PROGRESS_KEY, &self.snapshot()) {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to save progress");
                SaveStatus::Failed(format!("{e:#}"))
            }
        }
    }
}

/// Missing, corrupt or wrong-schema records all yield the initial record.
fn read_progress<S: ProgressStore>(store: &S, catalog: &Catalog, ranks: &[Rank]) -> Progress {
    match store.load(PROGRESS_KEY) {
        Some(data) if data.needs_reset() => {
            tracing::warn!(
                found = data.schema_version,
                "progress schema mismatch, starting fresh"
            );
            Progress::new()
        }
        Some(data) => {
            if data.rank_is_stale(ranks) {
                tracing::debug!(stored = %data.rank, "stored rank ignored");
            }
            data.to_progress(catalog)
        }
        None => {
            tracing::info!("no usable progress record, starting fresh");
            Progress::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DEFAULT_RANKS;
    use crate::store::MemoryStore;
    use crate::store::schema::SCHEMA_VERSION;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_fresh_store_starts_at_initial_record() {
        let catalog = catalog();
        let tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
        assert_eq!(tracker.snapshot(), ProgressData::default());
        assert_eq!(tracker.store().write_count(), 0);
    }

    #[test]
    fn test_every_completion_is_persisted() {
        let catalog = catalog();
        let mut tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
        let recorded = tracker.record_completion(&catalog, "L1", 350).unwrap();
        assert_eq!(recorded.saved, SaveStatus::Saved);
        tracker.record_completion(&catalog, "L1", 100).unwrap();
        assert_eq!(tracker.store().write_count(), 2);

        let stored = tracker.store().load(PROGRESS_KEY).unwrap();
        assert_eq!(stored.score, 450);
        assert_eq!(stored.frontier_index, 1);
        assert_eq!(stored.rank, "Candidate");
    }

    #[test]
    fn test_failed_save_keeps_in_memory_effect() {
        let catalog = catalog();
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut tracker = ProgressTracker::load(store, &catalog, DEFAULT_RANKS);
        let recorded = tracker.record_completion(&catalog, "L1", 350).unwrap();
        assert!(matches!(recorded.saved, SaveStatus::Failed(ref msg) if msg.contains("unavailable")));
        assert_eq!(recorded.outcome.unlocked, Some(1));
        assert_eq!(tracker.progress().score(), 350);
        assert!(tracker.store().load(PROGRESS_KEY).is_none());
    }

    #[test]
    fn test_unknown_level_does_not_write() {
        let catalog = catalog();
        let mut tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
        assert!(tracker.record_completion(&catalog, "nope", 10).is_err());
        assert_eq!(tracker.store().write_count(), 0);
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let catalog = catalog();
        let store = MemoryStore::new();
        store.insert_raw(PROGRESS_KEY, "garbage");
        let tracker = ProgressTracker::load(store, &catalog, DEFAULT_RANKS);
        assert_eq!(tracker.progress(), &Progress::new());
    }

    #[test]
    fn test_schema_mismatch_falls_back() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let data = ProgressData {
            schema_version: SCHEMA_VERSION + 1,
            score: 9000,
            ..ProgressData::default()
        };
        store.save(PROGRESS_KEY, &data).unwrap();
        let tracker = ProgressTracker::load(store, &catalog, DEFAULT_RANKS);
        assert_eq!(tracker.progress().score(), 0);
    }

    #[test]
    fn test_load_rebuilds_rank_and_clamps_frontier() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let data = ProgressData {
            frontier_index: 40,
            score: 2600,
            rank: "Candidate".to_string(),
            ..ProgressData::default()
        };
        store.save(PROGRESS_KEY, &data).unwrap();
        let tracker = ProgressTracker::load(store, &catalog, DEFAULT_RANKS);
        assert_eq!(tracker.rank().name, "Junior Partner");
        assert_eq!(tracker.progress().frontier_index(), catalog.last_index());
    }

    #[test]
    fn test_reset_writes_initial_record() {
        let catalog = catalog();
        let mut tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
        tracker.record_completion(&catalog, "L1", 350).unwrap();
        assert_eq!(tracker.reset(), SaveStatus::Saved);
        assert_eq!(
            tracker.store().load(PROGRESS_KEY),
            Some(ProgressData::default())
        );
    }

    #[test]
    fn test_reload_picks_up_replaced_record() {
        let catalog = catalog();
        let mut tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
        let replacement = ProgressData {
            frontier_index: 3,
            score: 1200,
            ..ProgressData::default()
        };
        tracker.store().save(PROGRESS_KEY, &replacement).unwrap();
        tracker.reload(&catalog);
        assert_eq!(tracker.progress().frontier_index(), 3);
        assert_eq!(tracker.rank().name, "Senior Associate");
    }

    #[test]
    fn test_reload_with_foreign_schema_starts_fresh() {
        let catalog = catalog();
        let mut tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
        tracker.record_completion(&catalog, "L1", 400).unwrap();

        let foreign = ProgressData {
            schema_version: SCHEMA_VERSION + 1,
            frontier_index: 4,
            score: 5000,
            ..ProgressData::default()
        };
        tracker.store().save(PROGRESS_KEY, &foreign).unwrap();
        tracker.reload(&catalog);
        assert_eq!(tracker.progress(), &Progress::new());
    }
}
