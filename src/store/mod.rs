pub mod json_store;
pub mod memory;
pub mod schema;
pub mod tracker;

use anyhow::Result;

pub use json_store::JsonStore;
pub use memory::MemoryStore;
pub use schema::{ExportData, ProgressData};
pub use tracker::{ProgressTracker, Recorded, SaveStatus};

/// Key under which the progression record lives.
pub const PROGRESS_KEY: &str = "progress";

/// Durable key-value capability for the progression record.
///
/// `load` returns `None` for both a missing and an unreadable record; callers
/// treat either as "start fresh". A failed `save` is reported, never fatal.
pub trait ProgressStore {
    fn load(&self, key: &str) -> Option<ProgressData>;
    fn save(&self, key: &str, data: &ProgressData) -> Result<()>;
}
