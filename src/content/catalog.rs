use std::sync::Arc;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.json");

/// Correction value meaning "delete this text from the citation". A token
/// displaying it is rendered as absent rather than as an editable control.
pub const REMOVE_TEXT: &str = "[Remove Text]";

// --- Questions ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub options: Vec<String>,
    pub correct_option: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildQuestion {
    /// Target sequence, in order.
    pub segments: Vec<String>,
    /// Never part of a correct assembly.
    #[serde(default)]
    pub distractors: Vec<String>,
}

impl BuildQuestion {
    pub fn target_text(&self) -> String {
        self.segments.join(" ")
    }
}

/// Source facts shown next to a simulation. Display only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    pub title: String,
    pub court: String,
    pub date: String,
    pub source: String,
    #[serde(default)]
    pub history: Option<String>,
    pub facts: String,
}

/// An editable unit of simulated citation text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub display: String,
    pub options: Vec<String>,
    pub correct: String,
    #[serde(default)]
    pub locked: bool,
}

impl Token {
    pub fn is_correct(&self) -> bool {
        self.display == self.correct
    }

    pub fn is_removed(&self) -> bool {
        self.display == REMOVE_TEXT
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationQuestion {
    pub case_file: CaseFile,
    pub tokens: Vec<Token>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice(ChoiceQuestion),
    BuildCitation(BuildQuestion),
    Simulation(SimulationQuestion),
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice(_) => "Multiple Choice",
            QuestionKind::BuildCitation(_) => "Build the Citation",
            QuestionKind::Simulation(_) => "Case File Review",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub explanation: String,
    #[serde(default)]
    pub rule_reference: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

// --- Levels ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Informational only. Unlocking is positional.
    #[serde(default)]
    pub required_score: u64,
    pub questions: Vec<Question>,
}

// --- Catalog ---

/// Immutable, ordered level list. Levels are shared with sessions by `Arc`.
#[derive(Clone, Debug)]
pub struct Catalog {
    levels: Vec<Arc<Level>>,
}

impl Catalog {
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        if levels.is_empty() {
            bail!("Catalog has no levels");
        }
        if let Some(level) = levels.iter().find(|l| l.questions.is_empty()) {
            bail!("Level '{}' has no questions", level.id);
        }
        Ok(Self {
            levels: levels.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// The content bundled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn levels(&self) -> &[Arc<Level>] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Level>> {
        self.levels.get(index)
    }

    pub fn level_position(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Level>> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn next_level(&self, id: &str) -> Option<&Arc<Level>> {
        self.level_position(id).and_then(|i| self.levels.get(i + 1))
    }
}
