use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use serde_json::json;
use tracing::info;

use crate::{
    common::{app_state::AppState, server_error::ServerError},
    game::{
        db,
        models::{JoinGameRequest, StartGameRequest},
    },
    quiz::db::get_quiz_by_id,
};

pub fn game_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_game))
        .route("/join", post(join_game))
        .with_state(state)
}

/// Creates a new game session in waiting state and hands out its join code.
async fn start_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartGameRequest>,
) -> Result<impl IntoResponse, ServerError> {
    // The quiz must exist before a session can point at it.
    let quiz = get_quiz_by_id(state.get_pool(), &request.quiz_id).await?;

    // A failed insert evicts the registry entry again, so no orphaned
    // session is left answering joins for a row that never existed.
    let state_for_insert = Arc::clone(&state);
    let live = state
        .get_registry()
        .create_with(quiz.quiz_id, request.admin_id, |live| async move {
            db::insert_game_session(
                state_for_insert.get_pool(),
                live.session_id,
                live.quiz_id,
                live.admin_id,
                &live.code,
            )
            .await
            .map(|_| ())
        })
        .await?;

    info!("Created game session {} ({})", live.session_id, live.code);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "game_code": live.code,
            "game_session_id": live.session_id,
        })),
    ))
}

async fn join_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JoinGameRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let game_code = request.game_code.to_uppercase();

    let live = state
        .get_registry()
        .find_by_code(&game_code)
        .ok_or(ServerError::NotFound(format!("Game {}", game_code)))?;

    // The status lock stays held across the check and the insert, so a
    // concurrent end_game cannot admit a participant after the terminal
    // broadcast.
    let participant = live
        .admit(|| async {
            db::insert_participant(state.get_pool(), &live.session_id, &request.nickname).await
        })
        .await?;

    info!(
        "Participant {} ({}) joined game {}",
        participant.nickname, participant.participant_id, game_code
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "participant_id": participant.participant_id,
            "game_session_id": live.session_id,
        })),
    ))
}
