use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    common::{app_state::AppState, server_error::ServerError},
    quiz::{
        db,
        models::{
            CreateItemRequest, CreateQuizRequest, LayoutStyle, QuizWithItems, UpdateItemRequest,
            UpdateQuizRequest,
        },
    },
};

pub fn quiz_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create_quiz))
        .route(
            "/{quiz_id}",
            get(get_quiz).put(update_quiz).delete(delete_quiz),
        )
        .route("/{quiz_id}/item", post(add_item))
        .route("/item/{item_id}", put(update_item).delete(delete_item))
        .route("/admin/{admin_id}", get(get_admin_quizzes))
        .with_state(state)
}

async fn create_quiz(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let num_positions = request.num_positions.unwrap_or(4);
    if num_positions < 1 {
        return Err(ServerError::Validation(
            "num_positions must be at least 1".into(),
        ));
    }

    let quiz = db::insert_quiz(
        state.get_pool(),
        request.admin_id,
        &request.title,
        request.description.as_deref(),
        num_positions,
        request.layout_style.unwrap_or(LayoutStyle::Grid),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let quiz = db::get_quiz_by_id(state.get_pool(), &quiz_id).await?;
    let items = db::get_items_by_quiz(state.get_pool(), &quiz_id).await?;

    Ok((StatusCode::OK, Json(QuizWithItems { quiz, items })))
}

async fn update_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if let Some(num_positions) = request.num_positions {
        if num_positions < 1 {
            return Err(ServerError::Validation(
                "num_positions must be at least 1".into(),
            ));
        }
    }

    let quiz = db::update_quiz(
        state.get_pool(),
        &quiz_id,
        request.title.as_deref(),
        request.description.as_deref(),
        request.num_positions,
        request.layout_style,
    )
    .await?;

    Ok((StatusCode::OK, Json(quiz)))
}

async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    db::delete_quiz(state.get_pool(), &quiz_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let quiz = db::get_quiz_by_id(state.get_pool(), &quiz_id).await?;
    validate_position(request.correct_position, quiz.num_positions)?;

    let item = db::insert_item(
        state.get_pool(),
        &quiz_id,
        request.text.as_deref(),
        &request.image_url,
        request.correct_position,
        request.item_order.unwrap_or(1),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ServerError> {
    if let Some(correct_position) = request.correct_position {
        let existing = db::get_item_by_id(state.get_pool(), &item_id).await?;
        let quiz = db::get_quiz_by_id(state.get_pool(), &existing.quiz_id).await?;
        validate_position(correct_position, quiz.num_positions)?;
    }

    let item = db::update_item(
        state.get_pool(),
        &item_id,
        request.text.as_deref(),
        request.image_url.as_deref(),
        request.correct_position,
        request.item_order,
    )
    .await?;

    Ok((StatusCode::OK, Json(item)))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    db::delete_item(state.get_pool(), &item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_admin_quizzes(
    State(state): State<Arc<AppState>>,
    Path(admin_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let quizzes = db::get_quizzes_by_admin(state.get_pool(), &admin_id).await?;
    Ok((StatusCode::OK, Json(quizzes)))
}

fn validate_position(correct_position: i32, num_positions: i32) -> Result<(), ServerError> {
    if correct_position < 1 || correct_position > num_positions {
        return Err(ServerError::Validation(format!(
            "correct_position must be between 1 and {}",
            num_positions
        )));
    }
    Ok(())
}
