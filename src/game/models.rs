use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, sqlx::Type)]
#[sqlx(type_name = "game_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Active,
    Completed,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Waiting => write!(f, "waiting"),
            GameStatus::Active => write!(f, "active"),
            GameStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct GameSession {
    pub game_session_id: Uuid,
    pub quiz_id: Uuid,
    pub admin_id: Uuid,
    pub game_code: String,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Participant {
    pub participant_id: Uuid,
    pub game_session_id: Uuid,
    pub nickname: String,
    pub total_score: i32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub quiz_id: Uuid,
    pub admin_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    pub game_code: String,
    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub nickname: String,
    pub score: i32,
    pub rank: usize,
}

/// Rank is the 1-based sorted position. Equal scores keep their arrival
/// order and still get distinct ranks.
pub fn build_leaderboard(participants: &[Participant]) -> Vec<LeaderboardEntry> {
    participants
        .iter()
        .enumerate()
        .map(|(idx, p)| LeaderboardEntry {
            nickname: p.nickname.clone(),
            score: p.total_score,
            rank: idx + 1,
        })
        .collect()
}
