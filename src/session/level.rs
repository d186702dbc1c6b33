use std::sync::Arc;

use chrono::Utc;
use rand::rngs::SmallRng;

use crate::content::{Level, Question, QuestionKind};
use crate::engine::evaluate::level_max_points;
use crate::session::error::SessionError;
use crate::session::response::Response;
use crate::session::result::{LevelResult, QuestionOutcome};

/// Feedback shown after a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub question_id: String,
    pub correct: bool,
    pub awarded: u32,
    pub explanation: String,
    pub rule_reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Collecting a response for question `index`.
    Active { index: usize, response: Response },
    /// Submitted. The response is frozen and the verdict is shown.
    Answered {
        index: usize,
        response: Response,
        verdict: Verdict,
    },
    Complete(LevelResult),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Next(usize),
    Complete(LevelResult),
}

/// One run through a level: walks the questions in order, one submission each.
pub struct LevelSession {
    level: Arc<Level>,
    state: SessionState,
    points: u32,
    outcomes: Vec<QuestionOutcome>,
    /// Shuffles build pools. `None` keeps catalog order.
    rng: Option<SmallRng>,
}

impl LevelSession {
    pub fn start(level: Arc<Level>, mut rng: Option<SmallRng>) -> Result<Self, SessionError> {
        let first = level
            .questions
            .first()
            .ok_or_else(|| SessionError::EmptyLevel(level.id.clone()))?;
        let response = Response::for_question(first, rng.as_mut());
        tracing::info!(level = %level.id, questions = level.questions.len(), "level started");
        Ok(Self {
            level,
            state: SessionState::Active { index: 0, response },
            points: 0,
            outcomes: Vec::new(),
            rng,
        })
    }

    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn max_points(&self) -> u32 {
        level_max_points(&self.level)
    }

    pub fn question_count(&self) -> usize {
        self.level.questions.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            SessionState::Active { index, .. } | SessionState::Answered { index, .. } => {
                Some(*index)
            }
            SessionState::Complete(_) => None,
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.current_index().map(|i| &self.level.questions[i])
    }

    pub fn response(&self) -> Option<&Response> {
        match &self.state {
            SessionState::Active { response, .. } | SessionState::Answered { response, .. } => {
                Some(response)
            }
            SessionState::Complete(_) => None,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.state {
            SessionState::Answered { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&LevelResult> {
        match &self.state {
            SessionState::Complete(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Complete(_))
    }

    fn active(&mut self) -> Result<(&Question, &mut Response), SessionError> {
        match &mut self.state {
            SessionState::Active { index, response } => Ok((&self.level.questions[*index], response)),
            _ => Err(SessionError::NotActive),
        }
    }

    // --- Response editing ---

    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        match self.active()? {
            (
                Question {
                    kind: QuestionKind::MultipleChoice(choice),
                    ..
                },
                Response::Choice(resp),
            ) => resp.select(choice, option),
            _ => Err(SessionError::WrongKind {
                expected: "Multiple Choice",
            }),
        }
    }

    pub fn place_segment(&mut self, segment_id: u32) -> Result<(), SessionError> {
        match self.active()? {
            (_, Response::Build(resp)) => resp.place(segment_id),
            _ => Err(SessionError::WrongKind {
                expected: "Build the Citation",
            }),
        }
    }

    pub fn unplace_segment(&mut self, position: usize) -> Result<u32, SessionError> {
        match self.active()? {
            (_, Response::Build(resp)) => resp.unplace(position),
            _ => Err(SessionError::WrongKind {
                expected: "Build the Citation",
            }),
        }
    }

    pub fn toggle_selector(&mut self, token_id: &str) -> Result<(), SessionError> {
        match self.active()? {
            (_, Response::Simulation(resp)) => resp.toggle_selector(token_id),
            _ => Err(SessionError::WrongKind {
                expected: "Case File Review",
            }),
        }
    }

    pub fn close_selector(&mut self) -> Result<(), SessionError> {
        match self.active()? {
            (_, Response::Simulation(resp)) => {
                resp.close_selector();
                Ok(())
            }
            _ => Err(SessionError::WrongKind {
                expected: "Case File Review",
            }),
        }
    }

    pub fn choose_token_option(&mut self, token_id: &str, option: &str) -> Result<(), SessionError> {
        match self.active()? {
            (_, Response::Simulation(resp)) => resp.choose_option(token_id, option),
            _ => Err(SessionError::WrongKind {
                expected: "Case File Review",
            }),
        }
    }

    // --- Transitions ---

    /// Judge the current response. Allowed once per question.
    pub fn submit(&mut self) -> Result<Verdict, SessionError> {
        let SessionState::Active { index, response } = &self.state else {
            return Err(SessionError::NotActive);
        };
        let index = *index;
        let question = &self.level.questions[index];
        let evaluation = response.evaluate(question)?;
        let verdict = Verdict {
            question_id: question.id.clone(),
            correct: evaluation.correct,
            awarded: evaluation.awarded,
            explanation: question.explanation.clone(),
            rule_reference: question.rule_reference.clone(),
        };
        let mut response = response.clone();
        // Editing ends here; an answered question never shows a dropdown.
        if let Response::Simulation(sim) = &mut response {
            sim.close_selector();
        }

        self.points += evaluation.awarded;
        self.outcomes.push(QuestionOutcome {
            question_id: verdict.question_id.clone(),
            correct: verdict.correct,
            awarded: verdict.awarded,
        });
        tracing::debug!(
            level = %self.level.id,
            question = %verdict.question_id,
            correct = verdict.correct,
            awarded = verdict.awarded,
            "answer submitted"
        );

        self.state = SessionState::Answered {
            index,
            response,
            verdict: verdict.clone(),
        };
        Ok(verdict)
    }

    /// Move past an answered question: to the next one, or to completion.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let SessionState::Answered { index, .. } = &self.state else {
            return Err(SessionError::NotAnswered);
        };
        let next = *index + 1;

        if let Some(question) = self.level.questions.get(next) {
            let response = Response::for_question(question, self.rng.as_mut());
            self.state = SessionState::Active {
                index: next,
                response,
            };
            return Ok(Advance::Next(next));
        }

        let result = LevelResult {
            level_id: self.level.id.clone(),
            points: self.points,
            max_points: self.max_points(),
            outcomes: self.outcomes.clone(),
            finished_at: Utc::now(),
        };
        tracing::info!(
            level = %result.level_id,
            points = result.points,
            max = result.max_points,
            "level complete"
        );
        self.state = SessionState::Complete(result.clone());
        Ok(Advance::Complete(result))
    }

    /// Abandon the run. Accumulated points are discarded.
    pub fn exit(self) {
        if !self.is_complete() {
            tracing::info!(
                level = %self.level.id,
                answered = self.outcomes.len(),
                discarded = self.points,
                "level abandoned"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::content::{Catalog, REMOVE_TEXT};

    fn level(id: &str) -> Arc<Level> {
        Catalog::builtin().unwrap().find(id).unwrap().clone()
    }

    fn build_session(id: &str) -> LevelSession {
        LevelSession::start(level(id), Some(SmallRng::seed_from_u64(3))).unwrap()
    }

    fn segment_id(session: &LevelSession, text: &str) -> u32 {
        match session.response() {
            Some(Response::Build(resp)) => resp
                .available()
                .iter()
                .find(|s| s.text == text)
                .map(|s| s.id)
                .unwrap(),
            other => panic!("not a build response: {other:?}"),
        }
    }

    fn built(session: &LevelSession) -> Vec<String> {
        match session.response() {
            Some(Response::Build(resp)) => resp.built().to_vec(),
            other => panic!("not a build response: {other:?}"),
        }
    }

    fn answer_correctly(session: &mut LevelSession) {
        let question = session.question().unwrap().clone();
        match &question.kind {
            QuestionKind::MultipleChoice(choice) => {
                session.select_option(choice.correct_option).unwrap();
            }
            QuestionKind::BuildCitation(build) => {
                for text in &build.segments {
                    let id = segment_id(session, text);
                    session.place_segment(id).unwrap();
                }
            }
            QuestionKind::Simulation(sim) => {
                for token in sim.tokens.iter().filter(|t| !t.locked && !t.is_correct()) {
                    session.toggle_selector(&token.id).unwrap();
                    session.choose_token_option(&token.id, &token.correct).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_start_presents_first_question() {
        let session = build_session("L1");
        assert_eq!(session.current_index(), Some(0));
        assert!(session.is_active());
        assert_eq!(session.points(), 0);
        assert_eq!(session.question().unwrap().id, "q1-1");
        assert_eq!(session.response(), Some(&Response::Choice(Default::default())));
    }

    #[test]
    fn test_empty_level_cannot_start() {
        let mut empty = (*level("L1")).clone();
        empty.questions.clear();
        let err = LevelSession::start(Arc::new(empty), None).err();
        assert_eq!(err, Some(SessionError::EmptyLevel("L1".to_string())));
    }

    #[test]
    fn test_submit_twice_is_rejected() {
        let mut session = build_session("L1");
        session.select_option(0).unwrap();
        let verdict = session.submit().unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.awarded, 100);
        assert_eq!(verdict.rule_reference.as_deref(), Some("Rule 10.1"));
        assert_eq!(session.submit(), Err(SessionError::NotActive));
        assert_eq!(session.points(), 100);
    }

    #[test]
    fn test_response_frozen_after_submit() {
        let mut session = build_session("L1");
        session.select_option(1).unwrap();
        let verdict = session.submit().unwrap();
        assert!(!verdict.correct);
        assert_eq!(session.select_option(0), Err(SessionError::NotActive));
        assert!(matches!(
            session.response(),
            Some(Response::Choice(resp)) if resp.selected == Some(1)
        ));
    }

    #[test]
    fn test_advance_requires_answer() {
        let mut session = build_session("L1");
        assert_eq!(session.advance(), Err(SessionError::NotAnswered));
        session.select_option(0).unwrap();
        session.submit().unwrap();
        assert_eq!(session.advance(), Ok(Advance::Next(1)));
        assert_eq!(session.question().unwrap().id, "q1-2");
    }

    #[test]
    fn test_unanswered_choice_cannot_submit() {
        let mut session = build_session("L1");
        assert_eq!(session.submit(), Err(SessionError::NoSelection));
        assert!(session.is_active());
    }

    #[test]
    fn test_wrong_kind_actions_rejected() {
        let mut session = build_session("L1");
        assert_eq!(
            session.place_segment(0),
            Err(SessionError::WrongKind {
                expected: "Build the Citation"
            })
        );
        assert!(matches!(
            session.toggle_selector("t1"),
            Err(SessionError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_build_with_distractor_then_repair() {
        let mut session = build_session("L1");
        session.select_option(0).unwrap();
        session.submit().unwrap();
        session.advance().unwrap();

        // q1-2: Brown v. Bd. of Educ.
        let empty = session.submit();
        assert_eq!(empty, Err(SessionError::EmptyCitation));

        for text in ["US", "Brown v. Bd. of Educ.,", "347", "U.S.", "483", "(1954)."] {
            let id = segment_id(&session, text);
            session.place_segment(id).unwrap();
        }
        assert_eq!(built(&session)[0], "US");
        session.unplace_segment(0).unwrap();
        assert_eq!(
            built(&session),
            ["Brown v. Bd. of Educ.,", "347", "U.S.", "483", "(1954)."]
        );
        let verdict = session.submit().unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.awarded, 150);
        assert_eq!(session.points(), 250);
    }

    #[test]
    fn test_build_distractor_in_front_scores_zero() {
        let mut session = build_session("L1");
        session.select_option(0).unwrap();
        session.submit().unwrap();
        session.advance().unwrap();

        for text in ["US", "Brown v. Bd. of Educ.,", "347", "U.S.", "483", "(1954)."] {
            let id = segment_id(&session, text);
            session.place_segment(id).unwrap();
        }
        let verdict = session.submit().unwrap();
        assert!(!verdict.correct);
        assert_eq!(verdict.awarded, 0);
    }

    #[test]
    fn test_simulation_locked_token_and_fix() {
        let mut session = build_session("L6");
        assert_eq!(session.question().unwrap().id, "q6-1");
        assert_eq!(
            session.toggle_selector("t2"),
            Err(SessionError::TokenLocked("t2".to_string()))
        );
        session.toggle_selector("t1").unwrap();
        session.choose_token_option("t1", "Fed. Election Comm'n").unwrap();
        session.toggle_selector("t3").unwrap();
        session.choose_token_option("t3", "Wis. Right to Life, Inc.,").unwrap();
        session.toggle_selector("t4").unwrap();
        session.close_selector().unwrap();
        // Still on the wrong reporter.
        let verdict = session.submit().unwrap();
        assert!(!verdict.correct);
    }

    #[test]
    fn test_submit_closes_open_selector() {
        let mut session = build_session("L6");
        session.toggle_selector("t1").unwrap();
        session.submit().unwrap();
        match session.response() {
            Some(Response::Simulation(resp)) => assert_eq!(resp.open_token(), None),
            other => panic!("unexpected response {other:?}"),
        }
        assert_eq!(session.close_selector(), Err(SessionError::NotActive));
    }

    #[test]
    fn test_new_session_sees_pristine_tokens() {
        let lvl = level("L6");
        let mut first = LevelSession::start(lvl.clone(), None).unwrap();
        first.toggle_selector("t4").unwrap();
        first.choose_token_option("t4", "551 U.S. 449").unwrap();
        first.exit();

        let second = LevelSession::start(lvl.clone(), None).unwrap();
        match second.response() {
            Some(Response::Simulation(resp)) => {
                assert_eq!(resp.token("t4").unwrap().display, "551 S. Ct. 449");
            }
            other => panic!("unexpected response {other:?}"),
        }
        let QuestionKind::Simulation(sim) = &lvl.questions[0].kind else {
            panic!("q6-1 should be a simulation");
        };
        assert_eq!(sim.tokens[3].display, "551 S. Ct. 449");
    }

    #[test]
    fn test_removal_tokens_complete_q6_3() {
        let mut session = build_session("L6");
        for _ in 0..2 {
            answer_correctly(&mut session);
            session.submit().unwrap();
            session.advance().unwrap();
        }
        assert_eq!(session.question().unwrap().id, "q6-3");
        session.toggle_selector("t4").unwrap();
        session.choose_token_option("t4", REMOVE_TEXT).unwrap();
        session.toggle_selector("t5").unwrap();
        session.choose_token_option("t5", REMOVE_TEXT).unwrap();
        let verdict = session.submit().unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.awarded, 200);
    }

    #[test]
    fn test_perfect_run_completes_with_max_points() {
        let mut session = build_session("L1");
        let count = session.question_count();
        for i in 0..count {
            answer_correctly(&mut session);
            session.submit().unwrap();
            match session.advance().unwrap() {
                Advance::Next(next) => assert_eq!(next, i + 1),
                Advance::Complete(result) => {
                    assert_eq!(i, count - 1);
                    assert_eq!(result.points, 500);
                    assert_eq!(result.max_points, 500);
                    assert_eq!(result.question_count(), 4);
                    assert!(result.is_perfect());
                }
            }
        }
        assert!(session.is_complete());
        assert_eq!(session.current_index(), None);
        assert_eq!(session.advance(), Err(SessionError::NotAnswered));
        assert_eq!(session.submit(), Err(SessionError::NotActive));
    }

    #[test]
    fn test_mixed_run_totals() {
        let mut session = build_session("L1");
        // q1-1 right, q1-2 right, q1-3 wrong, q1-4 right.
        answer_correctly(&mut session);
        session.submit().unwrap();
        session.advance().unwrap();
        answer_correctly(&mut session);
        session.submit().unwrap();
        session.advance().unwrap();
        session.select_option(2).unwrap();
        session.submit().unwrap();
        session.advance().unwrap();
        answer_correctly(&mut session);
        session.submit().unwrap();
        let Advance::Complete(result) = session.advance().unwrap() else {
            panic!("level should be complete");
        };
        assert_eq!(result.points, 400);
        assert_eq!(result.correct_count(), 3);
        assert_eq!(session.result(), Some(&result));
    }
}
