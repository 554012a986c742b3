use std::{collections::HashMap, sync::Arc};

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    common::{app_state::AppState, server_error::ServerError},
    game::{
        db,
        models::{GameStatus, build_leaderboard},
    },
    live::{
        events::{ClientEvent, QuizSnapshot, ServerEvent},
        rooms::{ConnectionId, RoomKey},
        scoring,
    },
    quiz::db::{get_items_by_quiz, get_quiz_by_id},
};

pub fn live_routes(state: Arc<AppState>) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// One task per connection. Outbound events flow through an unbounded
/// channel so broadcasts never block on a slow socket.
async fn handle_socket(state: Arc<AppState>, socket: WebSocket) {
    let connection_id = Uuid::new_v4();
    let (sender, mut receiver) = mpsc::unbounded_channel::<ServerEvent>();
    state.get_rooms().register(connection_id, sender);
    debug!("Connection {} opened", connection_id);

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => {
                if let Err(e) = dispatch(&state, connection_id, event).await {
                    warn!("Dropped event from {}: {}", connection_id, e);
                }
            }
            Err(e) => warn!("Unparseable frame from {}: {}", connection_id, e),
        }
    }

    state.get_rooms().remove(&connection_id);
    writer.abort();
    debug!("Connection {} closed", connection_id);
}

async fn dispatch(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    event: ClientEvent,
) -> Result<(), ServerError> {
    match event {
        ClientEvent::JoinHostRoom { game_code } => {
            join_host_room(state, connection_id, &game_code);
            Ok(())
        }
        ClientEvent::JoinGame {
            game_code,
            nickname,
            participant_id,
        } => join_game(state, connection_id, &game_code, nickname, participant_id),
        ClientEvent::StartGame { game_code } => start_game(state, &game_code).await,
        ClientEvent::SubmitAnswer {
            participant_id,
            answers,
        } => submit_answer(state, connection_id, participant_id, answers).await,
        ClientEvent::GetResults { game_code } => get_results(state, &game_code).await,
        ClientEvent::EndGame { game_code } => end_game(state, &game_code).await,
    }
}

/// The hosting admin receives host-room events and game-wide events.
fn join_host_room(state: &Arc<AppState>, connection_id: ConnectionId, game_code: &str) {
    let rooms = state.get_rooms();
    rooms.join(connection_id, RoomKey::host(game_code));
    rooms.join(connection_id, RoomKey::game(game_code));
}

/// Joins the participant's connection to the game room and tells the host.
/// The participant row itself was created by the REST join endpoint.
fn join_game(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    game_code: &str,
    nickname: String,
    participant_id: Option<Uuid>,
) -> Result<(), ServerError> {
    let Some(_live) = state.get_registry().find_by_code(game_code) else {
        debug!("join_game for unknown code {} dropped", game_code);
        return Ok(());
    };

    let rooms = state.get_rooms();
    rooms.join(connection_id, RoomKey::game(game_code));
    rooms.broadcast(
        &RoomKey::host(game_code),
        ServerEvent::ParticipantJoined {
            nickname,
            participant_id,
        },
    );

    Ok(())
}

/// waiting -> active. Ships the full item set, correct positions included,
/// to everyone in the game room.
async fn start_game(state: &Arc<AppState>, game_code: &str) -> Result<(), ServerError> {
    let Some(live) = state.get_registry().find_by_code(game_code) else {
        debug!("start_game for unknown code {} dropped", game_code);
        return Ok(());
    };

    // The durable write happens inside the transition: if it fails the
    // session stays waiting and a retried start_game can still succeed.
    let persisted = live
        .begin(|| async {
            db::set_session_status(state.get_pool(), &live.session_id, GameStatus::Active).await
        })
        .await;
    match persisted {
        Ok(()) => {}
        Err(e @ ServerError::InvalidTransition(_)) => {
            debug!("start_game ignored: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    let quiz = get_quiz_by_id(state.get_pool(), &live.quiz_id).await?;
    let items = get_items_by_quiz(state.get_pool(), &live.quiz_id).await?;

    info!("Game {} started with {} items", game_code, items.len());

    state.get_rooms().broadcast(
        &RoomKey::game(game_code),
        ServerEvent::GameStarted {
            quiz: QuizSnapshot::from_quiz(&quiz, &items),
        },
    );

    Ok(())
}

/// Scores a submission and replies privately to the submitting connection.
/// An unknown participant is a silent no-op. A repeated submission
/// overwrites the stored score and appends further audit rows.
async fn submit_answer(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    participant_id: Uuid,
    answers: HashMap<String, serde_json::Value>,
) -> Result<(), ServerError> {
    // A malformed payload rejects the whole submission, nothing is scored.
    let placements = parse_placements(answers)?;

    let Some(participant) = db::get_participant(state.get_pool(), &participant_id).await? else {
        debug!("submit_answer for unknown participant {} dropped", participant_id);
        return Ok(());
    };

    let Some(live) = state.get_registry().find_by_id(&participant.game_session_id) else {
        debug!(
            "submit_answer for unregistered session {} dropped",
            participant.game_session_id
        );
        return Ok(());
    };

    let items = get_items_by_quiz(state.get_pool(), &live.quiz_id).await?;
    let outcome = scoring::score(&placements, &items);

    // Audit trail covers correct entries only; incorrect placements are
    // not recorded.
    for placement in &outcome.correct {
        db::insert_participant_answer(
            state.get_pool(),
            &participant_id,
            &placement.item_id,
            placement.given_position,
        )
        .await?;
    }

    db::update_participant_score(state.get_pool(), &participant_id, outcome.points_earned).await?;

    info!(
        "Participant {} scored {}/{} ({} points) in game {}",
        participant_id, outcome.correct_count, outcome.total_count, outcome.points_earned, live.code
    );

    state.get_rooms().send_to(
        &connection_id,
        ServerEvent::AnswerResult {
            correct_count: outcome.correct_count,
            total_items: outcome.total_count,
            points_earned: outcome.points_earned,
        },
    );

    Ok(())
}

/// Valid in any state. Rank is the 1-based sorted position, ties keep
/// arrival order.
async fn get_results(state: &Arc<AppState>, game_code: &str) -> Result<(), ServerError> {
    let Some(live) = state.get_registry().find_by_code(game_code) else {
        debug!("get_results for unknown code {} dropped", game_code);
        return Ok(());
    };

    let participants =
        db::list_participants_by_score(state.get_pool(), &live.session_id).await?;
    let leaderboard = build_leaderboard(&participants);

    state.get_rooms().broadcast(
        &RoomKey::game(game_code),
        ServerEvent::ResultsReady { leaderboard },
    );

    Ok(())
}

/// active -> completed, tolerated again on a completed session. After the
/// terminal broadcast the room produces no further events.
async fn end_game(state: &Arc<AppState>, game_code: &str) -> Result<(), ServerError> {
    let Some(live) = state.get_registry().find_by_code(game_code) else {
        debug!("end_game for unknown code {} dropped", game_code);
        return Ok(());
    };

    let persisted = live
        .complete(|| async {
            db::set_session_status(state.get_pool(), &live.session_id, GameStatus::Completed).await
        })
        .await;
    match persisted {
        Ok(()) => {}
        Err(e @ ServerError::InvalidTransition(_)) => {
            debug!("end_game ignored: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    info!("Game {} ended", game_code);

    state
        .get_rooms()
        .broadcast(&RoomKey::game(game_code), ServerEvent::GameEnded {});

    Ok(())
}

pub(crate) fn parse_placements(
    answers: HashMap<String, serde_json::Value>,
) -> Result<HashMap<Uuid, i32>, ServerError> {
    let mut placements = HashMap::with_capacity(answers.len());

    for (item_id, position) in answers {
        let item_id = Uuid::parse_str(&item_id)
            .map_err(|_| ServerError::Validation(format!("invalid item id: {}", item_id)))?;
        let position = position
            .as_i64()
            .and_then(|p| i32::try_from(p).ok())
            .ok_or(ServerError::Validation(format!(
                "invalid position for item {}",
                item_id
            )))?;
        placements.insert(item_id, position);
    }

    Ok(placements)
}
