use serde_json::json;
use uuid::Uuid;

use crate::{
    common::server_error::ServerError,
    live::{
        events::{ClientEvent, ServerEvent},
        handlers::parse_placements,
    },
};

#[test]
fn join_game_frame_parses() {
    let participant_id = Uuid::new_v4();
    let frame = json!({
        "event": "join_game",
        "data": {
            "game_code": "ABC123",
            "nickname": "A",
            "participant_id": participant_id,
        }
    });

    let event: ClientEvent = serde_json::from_value(frame).unwrap();
    match event {
        ClientEvent::JoinGame {
            game_code,
            nickname,
            participant_id: pid,
        } => {
            assert_eq!(game_code, "ABC123");
            assert_eq!(nickname, "A");
            assert_eq!(pid, Some(participant_id));
        }
        other => panic!("parsed into the wrong variant: {:?}", other),
    }
}

#[test]
fn submit_answer_frame_parses_with_string_item_keys() {
    let item_id = Uuid::new_v4();
    let frame = format!(
        r#"{{"event":"submit_answer","data":{{"participant_id":"{}","answers":{{"{}":2}}}}}}"#,
        Uuid::new_v4(),
        item_id
    );

    let event: ClientEvent = serde_json::from_str(&frame).unwrap();
    let ClientEvent::SubmitAnswer { answers, .. } = event else {
        panic!("parsed into the wrong variant");
    };

    let placements = parse_placements(answers).unwrap();
    assert_eq!(placements.get(&item_id), Some(&2));
}

#[test]
fn malformed_item_id_rejects_the_whole_submission() {
    let good = Uuid::new_v4();
    let mut answers = std::collections::HashMap::new();
    answers.insert(good.to_string(), json!(1));
    answers.insert("not-a-uuid".to_string(), json!(2));

    let err = parse_placements(answers).unwrap_err();
    assert!(matches!(err, ServerError::Validation(_)));
}

#[test]
fn non_numeric_position_rejects_the_whole_submission() {
    let mut answers = std::collections::HashMap::new();
    answers.insert(Uuid::new_v4().to_string(), json!("first"));

    let err = parse_placements(answers).unwrap_err();
    assert!(matches!(err, ServerError::Validation(_)));
}

#[test]
fn outbound_events_carry_snake_case_tags() {
    let ended = serde_json::to_value(ServerEvent::GameEnded {}).unwrap();
    assert_eq!(ended["event"], "game_ended");

    let result = serde_json::to_value(ServerEvent::AnswerResult {
        correct_count: 1,
        total_items: 2,
        points_earned: 500,
    })
    .unwrap();
    assert_eq!(result["event"], "answer_result");
    assert_eq!(result["data"]["points_earned"], 500);

    let ready = serde_json::to_value(ServerEvent::ResultsReady {
        leaderboard: vec![],
    })
    .unwrap();
    assert_eq!(ready["event"], "results_ready");
    assert!(ready["data"]["leaderboard"].as_array().unwrap().is_empty());
}

#[test]
fn unknown_event_name_fails_to_parse() {
    let frame = json!({ "event": "reticulate_splines", "data": {} });
    assert!(serde_json::from_value::<ClientEvent>(frame).is_err());
}
