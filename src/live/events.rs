use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game::models::LeaderboardEntry,
    quiz::models::{LayoutStyle, Quiz, QuizItem},
};

/// Inbound frames: `{"event": "...", "data": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinHostRoom {
        game_code: String,
    },
    JoinGame {
        game_code: String,
        nickname: String,
        participant_id: Option<Uuid>,
    },
    StartGame {
        game_code: String,
    },
    SubmitAnswer {
        participant_id: Uuid,
        /// item_id -> chosen drop position.
        answers: HashMap<String, serde_json::Value>,
    },
    GetResults {
        game_code: String,
    },
    EndGame {
        game_code: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    ParticipantJoined {
        nickname: String,
        participant_id: Option<Uuid>,
    },
    GameStarted {
        quiz: QuizSnapshot,
    },
    AnswerResult {
        correct_count: usize,
        total_items: usize,
        points_earned: i32,
    },
    ResultsReady {
        leaderboard: Vec<LeaderboardEntry>,
    },
    GameEnded {},
}

/// The item set handed to clients on game start. Includes
/// correct_position: the client is trusted to place and self-check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub title: String,
    pub description: Option<String>,
    pub num_positions: i32,
    pub layout_style: LayoutStyle,
    pub items: Vec<ItemSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    pub item_id: Uuid,
    pub text: Option<String>,
    pub image_url: String,
    pub item_order: i32,
    pub correct_position: i32,
}

impl QuizSnapshot {
    pub fn from_quiz(quiz: &Quiz, items: &[QuizItem]) -> Self {
        Self {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            num_positions: quiz.num_positions,
            layout_style: quiz.layout_style,
            items: items
                .iter()
                .map(|item| ItemSnapshot {
                    item_id: item.item_id,
                    text: item.text.clone(),
                    image_url: item.image_url.clone(),
                    item_order: item.item_order,
                    correct_position: item.correct_position,
                })
                .collect(),
        }
    }
}
