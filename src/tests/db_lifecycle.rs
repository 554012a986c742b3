use std::env;

use dotenv::dotenv;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    game::{
        db::{insert_game_session, set_session_status},
        models::GameStatus,
    },
    live::registry::generate_game_code,
    quiz::{
        db::{delete_quiz, insert_quiz},
        models::LayoutStyle,
    },
};

async fn setup_pool() -> Pool<Postgres> {
    dotenv().ok();
    let connection_string =
        env::var("DRAGQUIZ__DATABASE_URL").expect("Failed to obtain connection string");
    let pool = Pool::<Postgres>::connect(&connection_string)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn completed_sessions_release_their_code() {
    let pool = setup_pool().await;

    let quiz = insert_quiz(
        &pool,
        Uuid::new_v4(),
        "Capital cities",
        None,
        4,
        LayoutStyle::Grid,
    )
    .await
    .unwrap();

    let code = generate_game_code();
    let first = insert_game_session(&pool, Uuid::new_v4(), quiz.quiz_id, quiz.admin_id, &code)
        .await
        .unwrap();
    set_session_status(&pool, &first.game_session_id, GameStatus::Completed)
        .await
        .unwrap();

    // The code is free again once its session has completed, so a code
    // reallocated after a restart or an eviction inserts cleanly.
    let second = insert_game_session(&pool, Uuid::new_v4(), quiz.quiz_id, quiz.admin_id, &code)
        .await
        .unwrap();
    assert_eq!(second.game_code, code);

    // But two live sessions may never share a code.
    let clash = insert_game_session(&pool, Uuid::new_v4(), quiz.quiz_id, quiz.admin_id, &code).await;
    assert!(clash.is_err());

    // Cascade removes the sessions with the quiz.
    delete_quiz(&pool, &quiz.quiz_id).await.unwrap();
}
