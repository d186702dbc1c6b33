use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use citedr::content::{
    BuildQuestion, Catalog, DEFAULT_RANKS, Level, Question, QuestionKind, REMOVE_TEXT,
};
use citedr::session::{Advance, LevelSession, Response, SessionError};
use citedr::store::{MemoryStore, ProgressTracker};

fn single_build_level() -> Arc<Level> {
    Arc::new(Level {
        id: "T1".to_string(),
        title: "Test".to_string(),
        description: String::new(),
        required_score: 0,
        questions: vec![Question {
            id: "tq".to_string(),
            prompt: "Assemble".to_string(),
            explanation: "A then B then C".to_string(),
            rule_reference: None,
            kind: QuestionKind::BuildCitation(BuildQuestion {
                segments: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                distractors: vec!["D".to_string()],
            }),
        }],
    })
}

fn place(session: &mut LevelSession, text: &str) {
    let id = match session.response() {
        Some(Response::Build(resp)) => resp
            .available()
            .iter()
            .find(|s| s.text == text)
            .map(|s| s.id)
            .unwrap(),
        other => panic!("expected build response, got {other:?}"),
    };
    session.place_segment(id).unwrap();
}

/// Answer every question in the session correctly and return the final points.
fn play_perfect(session: &mut LevelSession) -> u32 {
    loop {
        let question = session.question().unwrap().clone();
        match &question.kind {
            QuestionKind::MultipleChoice(choice) => {
                session.select_option(choice.correct_option).unwrap();
            }
            QuestionKind::BuildCitation(build) => {
                for text in &build.segments {
                    place(session, text);
                }
            }
            QuestionKind::Simulation(sim) => {
                for token in sim.tokens.iter().filter(|t| !t.locked && !t.is_correct()) {
                    session.toggle_selector(&token.id).unwrap();
                    session.choose_token_option(&token.id, &token.correct).unwrap();
                }
            }
        }
        assert!(session.submit().unwrap().correct, "{}", question.id);
        if let Advance::Complete(result) = session.advance().unwrap() {
            return result.points;
        }
    }
}

#[test]
fn test_distractor_then_repair_scenario() {
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..5 {
        let seed = SmallRng::from_rng(&mut rng).unwrap();
        let mut session = LevelSession::start(single_build_level(), Some(seed)).unwrap();
        for text in ["D", "A", "B", "C"] {
            place(&mut session, text);
        }
        let mut probe = LevelSession::start(single_build_level(), None).unwrap();
        for text in ["D", "A", "B", "C"] {
            place(&mut probe, text);
        }
        assert!(!probe.submit().unwrap().correct);

        session.unplace_segment(0).unwrap();
        let verdict = session.submit().unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.awarded, 150);
    }
}

#[test]
fn test_full_course_unlocks_every_level() {
    let catalog = Catalog::builtin().unwrap();
    let mut tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
    let mut rng = SmallRng::seed_from_u64(2024);

    for (index, level) in catalog.levels().iter().enumerate() {
        assert!(tracker.progress().is_selectable(index), "{}", level.id);
        let seed = SmallRng::from_rng(&mut rng).unwrap();
        let mut session = LevelSession::start(level.clone(), Some(seed)).unwrap();
        let points = play_perfect(&mut session);
        assert_eq!(points, session.max_points());
        tracker
            .record_completion(&catalog, &level.id, points)
            .unwrap();
    }

    assert_eq!(tracker.progress().frontier_index(), catalog.last_index());
    assert!((tracker.progress().completion_ratio(&catalog) - 1.0).abs() < f64::EPSILON);
    assert_eq!(tracker.store().write_count(), catalog.len());
}

#[test]
fn test_exit_mid_level_records_nothing() {
    let catalog = Catalog::builtin().unwrap();
    let tracker = ProgressTracker::load(MemoryStore::new(), &catalog, DEFAULT_RANKS);
    let level = catalog.get(0).unwrap().clone();

    let mut session = LevelSession::start(level, None).unwrap();
    session.select_option(0).unwrap();
    session.submit().unwrap();
    assert_eq!(session.points(), 100);
    session.exit();

    assert_eq!(tracker.progress().score(), 0);
    assert_eq!(tracker.store().write_count(), 0);
}

#[test]
fn test_removal_sentinel_hides_text() {
    let catalog = Catalog::builtin().unwrap();
    let level = catalog.find("L6").unwrap().clone();
    let mut session = LevelSession::start(level, None).unwrap();
    // Skip to q6-3.
    for _ in 0..2 {
        let question = session.question().unwrap().clone();
        match &question.kind {
            QuestionKind::Simulation(sim) => {
                for token in sim.tokens.iter().filter(|t| !t.locked && !t.is_correct()) {
                    session.toggle_selector(&token.id).unwrap();
                    session.choose_token_option(&token.id, &token.correct).unwrap();
                }
            }
            QuestionKind::BuildCitation(build) => {
                for text in &build.segments {
                    place(&mut session, text);
                }
            }
            QuestionKind::MultipleChoice(_) => unreachable!(),
        }
        session.submit().unwrap();
        session.advance().unwrap();
    }

    let before = match session.response() {
        Some(Response::Simulation(resp)) => resp.rendered_text(),
        other => panic!("expected simulation, got {other:?}"),
    };
    session.toggle_selector("t4").unwrap();
    session.choose_token_option("t4", REMOVE_TEXT).unwrap();
    let after = match session.response() {
        Some(Response::Simulation(resp)) => resp.rendered_text(),
        other => panic!("expected simulation, got {other:?}"),
    };
    assert!(after.len() < before.len());
    assert!(!after.contains(REMOVE_TEXT));
}

#[test]
fn test_actions_after_completion_are_rejected() {
    let mut session = LevelSession::start(single_build_level(), None).unwrap();
    for text in ["A", "B", "C"] {
        place(&mut session, text);
    }
    session.submit().unwrap();
    assert!(matches!(session.advance(), Ok(Advance::Complete(_))));
    assert_eq!(session.place_segment(0), Err(SessionError::NotActive));
    assert_eq!(session.advance(), Err(SessionError::NotAnswered));
}
