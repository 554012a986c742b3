use std::collections::HashMap;

use uuid::Uuid;

use crate::quiz::models::QuizItem;

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectPlacement {
    pub item_id: Uuid,
    pub given_position: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub correct_count: usize,
    pub total_count: usize,
    pub points_earned: i32,
    /// Correct entries only; the caller appends one audit row per entry.
    /// Incorrect placements leave no trace beyond the counts.
    pub correct: Vec<CorrectPlacement>,
}

/// Scores a set of submitted placements against the quiz items. A partial
/// submission is scored against what was submitted, not the full item set.
/// Points are floor(1000 * correct / total), 0 for an empty submission.
pub fn score(placements: &HashMap<Uuid, i32>, items: &[QuizItem]) -> ScoreOutcome {
    let total_count = placements.len();
    let mut correct = Vec::new();

    for (item_id, given_position) in placements {
        let Some(item) = items.iter().find(|item| item.item_id == *item_id) else {
            continue;
        };
        if item.correct_position == *given_position {
            correct.push(CorrectPlacement {
                item_id: *item_id,
                given_position: *given_position,
            });
        }
    }

    let correct_count = correct.len();
    let points_earned = if total_count > 0 {
        (correct_count as i64 * 1000 / total_count as i64) as i32
    } else {
        0
    };

    ScoreOutcome {
        correct_count,
        total_count,
        points_earned,
        correct,
    }
}
