use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub correct: bool,
    pub awarded: u32,
}

/// Summary of one finished run through a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level_id: String,
    pub points: u32,
    pub max_points: u32,
    pub outcomes: Vec<QuestionOutcome>,
    pub finished_at: DateTime<Utc>,
}

impl LevelResult {
    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.correct).count()
    }

    pub fn question_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.outcomes.len() as f64 * 100.0
    }

    pub fn is_perfect(&self) -> bool {
        self.points == self.max_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, correct: bool, awarded: u32) -> QuestionOutcome {
        QuestionOutcome {
            question_id: id.to_string(),
            correct,
            awarded,
        }
    }

    #[test]
    fn test_accuracy_and_counts() {
        let result = LevelResult {
            level_id: "L1".to_string(),
            points: 250,
            max_points: 500,
            outcomes: vec![
                outcome("a", true, 100),
                outcome("b", false, 0),
                outcome("c", true, 150),
                outcome("d", false, 0),
            ],
            finished_at: Utc::now(),
        };
        assert_eq!(result.correct_count(), 2);
        assert_eq!(result.question_count(), 4);
        assert!((result.accuracy() - 50.0).abs() < f64::EPSILON);
        assert!(!result.is_perfect());
    }

    #[test]
    fn test_empty_outcomes_accuracy_is_zero() {
        let result = LevelResult {
            level_id: "L1".to_string(),
            points: 0,
            max_points: 0,
            outcomes: Vec::new(),
            finished_at: Utc::now(),
        };
        assert_eq!(result.accuracy(), 0.0);
    }
}
