pub mod catalog;
pub mod ranks;

pub use catalog::{
    BuildQuestion, CaseFile, Catalog, ChoiceQuestion, Level, Question, QuestionKind, REMOVE_TEXT,
    SimulationQuestion, Token,
};
pub use ranks::{DEFAULT_RANKS, Rank};
