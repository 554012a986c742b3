mod db_lifecycle;
mod events;
mod rooms;

use uuid::Uuid;

use crate::quiz::models::QuizItem;

pub fn make_item(quiz_id: Uuid, correct_position: i32, item_order: i32) -> QuizItem {
    QuizItem {
        item_id: Uuid::new_v4(),
        quiz_id,
        text: Some(format!("item {}", item_order)),
        image_url: format!("/static/uploads/item_{}.webp", item_order),
        correct_position,
        item_order,
    }
}
