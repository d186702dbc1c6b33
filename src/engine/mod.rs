pub mod evaluate;
pub mod progress;

pub use evaluate::Evaluation;
pub use progress::{CompletionOutcome, LevelEntry, Progress, ProgressError};
