use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    common::server_error::ServerError,
    game::models::{GameSession, GameStatus, Participant},
};

pub async fn insert_game_session(
    pool: &Pool<Postgres>,
    game_session_id: Uuid,
    quiz_id: Uuid,
    admin_id: Uuid,
    game_code: &str,
) -> Result<GameSession, ServerError> {
    let session = sqlx::query_as::<_, GameSession>(
        r#"
        INSERT INTO "game_sessions" (game_session_id, quiz_id, admin_id, game_code, status)
        VALUES ($1, $2, $3, $4, 'waiting')
        RETURNING game_session_id, quiz_id, admin_id, game_code, status, created_at
        "#,
    )
    .bind(game_session_id)
    .bind(quiz_id)
    .bind(admin_id)
    .bind(game_code)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn set_session_status(
    pool: &Pool<Postgres>,
    game_session_id: &Uuid,
    status: GameStatus,
) -> Result<(), ServerError> {
    let result = sqlx::query(
        r#"
        UPDATE "game_sessions"
        SET status = $2
        WHERE game_session_id = $1
        "#,
    )
    .bind(game_session_id)
    .bind(status)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound(format!(
            "Game session {}",
            game_session_id
        )));
    }

    Ok(())
}

pub async fn insert_participant(
    pool: &Pool<Postgres>,
    game_session_id: &Uuid,
    nickname: &str,
) -> Result<Participant, ServerError> {
    let participant = sqlx::query_as::<_, Participant>(
        r#"
        INSERT INTO "participants" (participant_id, game_session_id, nickname)
        VALUES ($1, $2, $3)
        RETURNING participant_id, game_session_id, nickname, total_score, joined_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(game_session_id)
    .bind(nickname)
    .fetch_one(pool)
    .await?;

    Ok(participant)
}

pub async fn get_participant(
    pool: &Pool<Postgres>,
    participant_id: &Uuid,
) -> Result<Option<Participant>, ServerError> {
    let participant = sqlx::query_as::<_, Participant>(
        r#"
        SELECT participant_id, game_session_id, nickname, total_score, joined_at
        FROM "participants"
        WHERE participant_id = $1
        "#,
    )
    .bind(participant_id)
    .fetch_optional(pool)
    .await?;

    Ok(participant)
}

pub async fn update_participant_score(
    pool: &Pool<Postgres>,
    participant_id: &Uuid,
    total_score: i32,
) -> Result<(), ServerError> {
    let result = sqlx::query(
        r#"
        UPDATE "participants"
        SET total_score = $2
        WHERE participant_id = $1
        "#,
    )
    .bind(participant_id)
    .bind(total_score)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound(format!(
            "Participant {}",
            participant_id
        )));
    }

    Ok(())
}

/// Ordered for the leaderboard: highest score first, ties by arrival.
pub async fn list_participants_by_score(
    pool: &Pool<Postgres>,
    game_session_id: &Uuid,
) -> Result<Vec<Participant>, ServerError> {
    let participants = sqlx::query_as::<_, Participant>(
        r#"
        SELECT participant_id, game_session_id, nickname, total_score, joined_at
        FROM "participants"
        WHERE game_session_id = $1
        ORDER BY total_score DESC, joined_at ASC
        "#,
    )
    .bind(game_session_id)
    .fetch_all(pool)
    .await?;

    Ok(participants)
}

pub async fn insert_participant_answer(
    pool: &Pool<Postgres>,
    participant_id: &Uuid,
    item_id: &Uuid,
    given_position: i32,
) -> Result<(), ServerError> {
    sqlx::query(
        r#"
        INSERT INTO "participant_answers"
            (participant_answer_id, participant_id, item_id, given_position, is_correct)
        VALUES ($1, $2, $3, $4, true)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(participant_id)
    .bind(item_id)
    .bind(given_position)
    .execute(pool)
    .await?;

    Ok(())
}
