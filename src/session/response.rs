use rand::Rng;
use rand::seq::SliceRandom;

use crate::content::{
    BuildQuestion, ChoiceQuestion, Question, QuestionKind, SimulationQuestion, Token,
};
use crate::engine::evaluate::{self, Evaluation};
use crate::session::error::SessionError;

// --- Multiple choice ---

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoiceResponse {
    pub selected: Option<usize>,
}

impl ChoiceResponse {
    pub fn select(&mut self, question: &ChoiceQuestion, index: usize) -> Result<(), SessionError> {
        let count = question.options.len();
        if index >= count {
            return Err(SessionError::OptionOutOfRange { index, count });
        }
        self.selected = Some(index);
        Ok(())
    }
}

// --- Citation building ---

/// A pool entry. `id` is unique within one response even when texts repeat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub id: u32,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildResponse {
    available: Vec<Segment>,
    built: Vec<String>,
    next_id: u32,
}

impl BuildResponse {
    /// Pool = target segments followed by distractors, shuffled when `rng` is given.
    pub fn new<R: Rng + ?Sized>(question: &BuildQuestion, rng: Option<&mut R>) -> Self {
        let mut available: Vec<Segment> = question
            .segments
            .iter()
            .chain(&question.distractors)
            .enumerate()
            .map(|(i, text)| Segment {
                id: i as u32,
                text: text.clone(),
            })
            .collect();
        if let Some(rng) = rng {
            available.shuffle(rng);
        }
        let next_id = available.len() as u32;
        Self {
            available,
            built: Vec::new(),
            next_id,
        }
    }

    pub fn available(&self) -> &[Segment] {
        &self.available
    }

    pub fn built(&self) -> &[String] {
        &self.built
    }

    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }

    /// Move one pool entry to the end of the built sequence.
    pub fn place(&mut self, segment_id: u32) -> Result<(), SessionError> {
        let pos = self
            .available
            .iter()
            .position(|s| s.id == segment_id)
            .ok_or(SessionError::UnknownSegment(segment_id))?;
        let segment = self.available.remove(pos);
        self.built.push(segment.text);
        Ok(())
    }

    /// Return a built entry to the pool under a fresh id.
    pub fn unplace(&mut self, position: usize) -> Result<u32, SessionError> {
        if position >= self.built.len() {
            return Err(SessionError::PositionOutOfRange {
                position,
                len: self.built.len(),
            });
        }
        let text = self.built.remove(position);
        let id = self.next_id;
        self.next_id += 1;
        self.available.push(Segment { id, text });
        Ok(id)
    }
}

// --- Simulation ---

/// Session-owned copy of a simulation's tokens plus the one open selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationResponse {
    tokens: Vec<Token>,
    open_token: Option<String>,
}

impl SimulationResponse {
    pub fn new(question: &SimulationQuestion) -> Self {
        Self {
            tokens: question.tokens.clone(),
            open_token: None,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn open_token(&self) -> Option<&str> {
        self.open_token.as_deref()
    }

    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Tokens the learner may open, in document order. Removed text is no
    /// longer part of the document and drops out of this list.
    pub fn editable_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.locked && !t.is_removed())
    }

    fn editable(&self, id: &str) -> Result<usize, SessionError> {
        let pos = self
            .tokens
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SessionError::UnknownToken(id.to_string()))?;
        if self.tokens[pos].locked {
            return Err(SessionError::TokenLocked(id.to_string()));
        }
        Ok(pos)
    }

    /// Open the selector on `id`, or close it if it is already the open one.
    /// Opening one selector closes any other.
    pub fn toggle_selector(&mut self, id: &str) -> Result<(), SessionError> {
        self.editable(id)?;
        if self.open_token.as_deref() == Some(id) {
            self.open_token = None;
        } else {
            self.open_token = Some(id.to_string());
        }
        Ok(())
    }

    pub fn close_selector(&mut self) {
        self.open_token = None;
    }

    pub fn choose_option(&mut self, id: &str, option: &str) -> Result<(), SessionError> {
        let pos = self.editable(id)?;
        if self.open_token.as_deref() != Some(id) {
            return Err(SessionError::SelectorClosed(id.to_string()));
        }
        let token = &mut self.tokens[pos];
        if !token.options.iter().any(|o| o == option) {
            return Err(SessionError::InvalidTokenOption {
                token: id.to_string(),
                option: option.to_string(),
            });
        }
        token.display = option.to_string();
        self.open_token = None;
        Ok(())
    }

    /// The citation as currently edited, with removed tokens left out.
    pub fn rendered_text(&self) -> String {
        self.tokens
            .iter()
            .filter(|t| !t.is_removed())
            .map(|t| t.display.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// --- Response ---

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Choice(ChoiceResponse),
    Build(BuildResponse),
    Simulation(SimulationResponse),
}

impl Response {
    pub fn for_question<R: Rng + ?Sized>(question: &Question, rng: Option<&mut R>) -> Self {
        match &question.kind {
            QuestionKind::MultipleChoice(_) => Response::Choice(ChoiceResponse::default()),
            QuestionKind::BuildCitation(build) => Response::Build(BuildResponse::new(build, rng)),
            QuestionKind::Simulation(sim) => Response::Simulation(SimulationResponse::new(sim)),
        }
    }

    /// Check the submission precondition for the kind, then judge.
    pub fn evaluate(&self, question: &Question) -> Result<Evaluation, SessionError> {
        match (&question.kind, self) {
            (QuestionKind::MultipleChoice(choice), Response::Choice(resp)) => {
                let selected = resp.selected.ok_or(SessionError::NoSelection)?;
                Ok(evaluate::evaluate_choice(choice, selected))
            }
            (QuestionKind::BuildCitation(build), Response::Build(resp)) => {
                if resp.is_empty() {
                    return Err(SessionError::EmptyCitation);
                }
                Ok(evaluate::evaluate_build(build, resp.built()))
            }
            (QuestionKind::Simulation(_), Response::Simulation(resp)) => {
                Ok(evaluate::evaluate_simulation(resp.tokens()))
            }
            (kind, _) => Err(SessionError::WrongKind {
                expected: kind.label(),
            }),
        }
    }
}
