use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, sqlx::Type)]
#[sqlx(type_name = "layout_style", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Grid,
    Mindmap,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Quiz {
    pub quiz_id: Uuid,
    pub admin_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub num_positions: i32,
    pub layout_style: LayoutStyle,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct QuizItem {
    pub item_id: Uuid,
    pub quiz_id: Uuid,
    pub text: Option<String>,
    pub image_url: String,
    pub correct_position: i32,
    pub item_order: i32,
}

#[derive(Debug, Serialize)]
pub struct QuizWithItems {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub items: Vec<QuizItem>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct QuizSummary {
    pub quiz_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub num_positions: i32,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub admin_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub num_positions: Option<i32>,
    pub layout_style: Option<LayoutStyle>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub num_positions: Option<i32>,
    pub layout_style: Option<LayoutStyle>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub text: Option<String>,
    pub image_url: String,
    pub correct_position: i32,
    pub item_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub correct_position: Option<i32>,
    pub item_order: Option<i32>,
}
