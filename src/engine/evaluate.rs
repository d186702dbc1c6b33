use crate::content::{BuildQuestion, ChoiceQuestion, Level, QuestionKind, Token};

pub const CHOICE_POINTS: u32 = 100;
pub const BUILD_POINTS: u32 = 150;
pub const SIMULATION_POINTS: u32 = 200;

/// Outcome of judging one submitted response. All-or-nothing: `awarded` is
/// either the full value for the question kind or zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    pub awarded: u32,
}

impl Evaluation {
    fn judge(correct: bool, points: u32) -> Self {
        Self {
            correct,
            awarded: if correct { points } else { 0 },
        }
    }
}

pub fn points_for(kind: &QuestionKind) -> u32 {
    match kind {
        QuestionKind::MultipleChoice(_) => CHOICE_POINTS,
        QuestionKind::BuildCitation(_) => BUILD_POINTS,
        QuestionKind::Simulation(_) => SIMULATION_POINTS,
    }
}

/// Points available if every question in the level is answered correctly.
pub fn level_max_points(level: &Level) -> u32 {
    level.questions.iter().map(|q| points_for(&q.kind)).sum()
}

pub fn evaluate_choice(question: &ChoiceQuestion, selected: usize) -> Evaluation {
    Evaluation::judge(selected == question.correct_option, CHOICE_POINTS)
}

/// Strict ordered comparison of the space-joined texts.
pub fn evaluate_build<S: AsRef<str>>(question: &BuildQuestion, built: &[S]) -> Evaluation {
    let built_text = built
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    Evaluation::judge(built_text == question.target_text(), BUILD_POINTS)
}

/// Every token must display its correct value, deletion marker included.
pub fn evaluate_simulation(tokens: &[Token]) -> Evaluation {
    Evaluation::judge(tokens.iter().all(Token::is_correct), SIMULATION_POINTS)
}
