use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    common::server_error::ServerError,
    quiz::models::{LayoutStyle, Quiz, QuizItem, QuizSummary},
};

pub async fn insert_quiz(
    pool: &Pool<Postgres>,
    admin_id: Uuid,
    title: &str,
    description: Option<&str>,
    num_positions: i32,
    layout_style: LayoutStyle,
) -> Result<Quiz, ServerError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO "quizzes" (quiz_id, admin_id, title, description, num_positions, layout_style)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING quiz_id, admin_id, title, description, num_positions, layout_style, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(admin_id)
    .bind(title)
    .bind(description)
    .bind(num_positions)
    .bind(layout_style)
    .fetch_one(pool)
    .await?;

    Ok(quiz)
}

pub async fn get_quiz_by_id(pool: &Pool<Postgres>, quiz_id: &Uuid) -> Result<Quiz, ServerError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT quiz_id, admin_id, title, description, num_positions, layout_style, created_at
        FROM "quizzes"
        WHERE quiz_id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!("Quiz {}", quiz_id)))?;

    Ok(quiz)
}

pub async fn get_items_by_quiz(
    pool: &Pool<Postgres>,
    quiz_id: &Uuid,
) -> Result<Vec<QuizItem>, ServerError> {
    let items = sqlx::query_as::<_, QuizItem>(
        r#"
        SELECT item_id, quiz_id, text, image_url, correct_position, item_order
        FROM "quiz_items"
        WHERE quiz_id = $1
        ORDER BY item_order
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn update_quiz(
    pool: &Pool<Postgres>,
    quiz_id: &Uuid,
    title: Option<&str>,
    description: Option<&str>,
    num_positions: Option<i32>,
    layout_style: Option<LayoutStyle>,
) -> Result<Quiz, ServerError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        UPDATE "quizzes"
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            num_positions = COALESCE($4, num_positions),
            layout_style = COALESCE($5, layout_style)
        WHERE quiz_id = $1
        RETURNING quiz_id, admin_id, title, description, num_positions, layout_style, created_at
        "#,
    )
    .bind(quiz_id)
    .bind(title)
    .bind(description)
    .bind(num_positions)
    .bind(layout_style)
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!("Quiz {}", quiz_id)))?;

    Ok(quiz)
}

pub async fn delete_quiz(pool: &Pool<Postgres>, quiz_id: &Uuid) -> Result<(), ServerError> {
    let result = sqlx::query(
        r#"
        DELETE FROM "quizzes"
        WHERE quiz_id = $1
        "#,
    )
    .bind(quiz_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound(format!("Quiz {}", quiz_id)));
    }

    Ok(())
}

pub async fn insert_item(
    pool: &Pool<Postgres>,
    quiz_id: &Uuid,
    text: Option<&str>,
    image_url: &str,
    correct_position: i32,
    item_order: i32,
) -> Result<QuizItem, ServerError> {
    let item = sqlx::query_as::<_, QuizItem>(
        r#"
        INSERT INTO "quiz_items" (item_id, quiz_id, text, image_url, correct_position, item_order)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING item_id, quiz_id, text, image_url, correct_position, item_order
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(quiz_id)
    .bind(text)
    .bind(image_url)
    .bind(correct_position)
    .bind(item_order)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn get_item_by_id(pool: &Pool<Postgres>, item_id: &Uuid) -> Result<QuizItem, ServerError> {
    let item = sqlx::query_as::<_, QuizItem>(
        r#"
        SELECT item_id, quiz_id, text, image_url, correct_position, item_order
        FROM "quiz_items"
        WHERE item_id = $1
        "#,
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!("Item {}", item_id)))?;

    Ok(item)
}

pub async fn update_item(
    pool: &Pool<Postgres>,
    item_id: &Uuid,
    text: Option<&str>,
    image_url: Option<&str>,
    correct_position: Option<i32>,
    item_order: Option<i32>,
) -> Result<QuizItem, ServerError> {
    let item = sqlx::query_as::<_, QuizItem>(
        r#"
        UPDATE "quiz_items"
        SET text = COALESCE($2, text),
            image_url = COALESCE($3, image_url),
            correct_position = COALESCE($4, correct_position),
            item_order = COALESCE($5, item_order)
        WHERE item_id = $1
        RETURNING item_id, quiz_id, text, image_url, correct_position, item_order
        "#,
    )
    .bind(item_id)
    .bind(text)
    .bind(image_url)
    .bind(correct_position)
    .bind(item_order)
    .fetch_optional(pool)
    .await?
    .ok_or(ServerError::NotFound(format!("Item {}", item_id)))?;

    Ok(item)
}

pub async fn delete_item(pool: &Pool<Postgres>, item_id: &Uuid) -> Result<(), ServerError> {
    let result = sqlx::query(
        r#"
        DELETE FROM "quiz_items"
        WHERE item_id = $1
        "#,
    )
    .bind(item_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServerError::NotFound(format!("Item {}", item_id)));
    }

    Ok(())
}

pub async fn get_quizzes_by_admin(
    pool: &Pool<Postgres>,
    admin_id: &Uuid,
) -> Result<Vec<QuizSummary>, ServerError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT q.quiz_id, q.title, q.description, q.num_positions, q.created_at,
               COUNT(i.item_id) AS item_count
        FROM "quizzes" q
        LEFT JOIN "quiz_items" i ON i.quiz_id = q.quiz_id
        WHERE q.admin_id = $1
        GROUP BY q.quiz_id
        ORDER BY q.created_at DESC
        "#,
    )
    .bind(admin_id)
    .fetch_all(pool)
    .await?;

    Ok(quizzes)
}
