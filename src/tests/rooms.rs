use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

use crate::live::{
    events::ServerEvent,
    rooms::{ConnectionId, RoomBroadcaster, RoomKey},
};

fn connect(rooms: &RoomBroadcaster) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
    let connection_id = Uuid::new_v4();
    let (sender, receiver) = mpsc::unbounded_channel();
    rooms.register(connection_id, sender);
    (connection_id, receiver)
}

#[tokio::test]
async fn broadcast_reaches_every_room_member() {
    let rooms = RoomBroadcaster::new();
    let (host, mut host_rx) = connect(&rooms);
    let (player, mut player_rx) = connect(&rooms);

    rooms.join(host, RoomKey::game("ABC123"));
    rooms.join(player, RoomKey::game("ABC123"));

    rooms.broadcast(&RoomKey::game("ABC123"), ServerEvent::GameEnded {});

    assert_eq!(host_rx.try_recv().unwrap(), ServerEvent::GameEnded {});
    assert_eq!(player_rx.try_recv().unwrap(), ServerEvent::GameEnded {});
}

#[tokio::test]
async fn host_room_events_skip_the_game_room() {
    let rooms = RoomBroadcaster::new();
    let (host, mut host_rx) = connect(&rooms);
    let (player, mut player_rx) = connect(&rooms);

    rooms.join(host, RoomKey::host("ABC123"));
    rooms.join(host, RoomKey::game("ABC123"));
    rooms.join(player, RoomKey::game("ABC123"));

    let joined = ServerEvent::ParticipantJoined {
        nickname: "A".into(),
        participant_id: Some(Uuid::new_v4()),
    };
    rooms.broadcast(&RoomKey::host("ABC123"), joined.clone());

    assert_eq!(host_rx.try_recv().unwrap(), joined);
    assert!(player_rx.try_recv().is_err());
}

#[tokio::test]
async fn send_to_targets_a_single_connection() {
    let rooms = RoomBroadcaster::new();
    let (submitter, mut submitter_rx) = connect(&rooms);
    let (other, mut other_rx) = connect(&rooms);

    rooms.join(submitter, RoomKey::game("ABC123"));
    rooms.join(other, RoomKey::game("ABC123"));

    let result = ServerEvent::AnswerResult {
        correct_count: 1,
        total_items: 2,
        points_earned: 500,
    };
    rooms.send_to(&submitter, result.clone());

    assert_eq!(submitter_rx.try_recv().unwrap(), result);
    assert!(other_rx.try_recv().is_err());
}

#[tokio::test]
async fn removed_connections_receive_nothing() {
    let rooms = RoomBroadcaster::new();
    let (gone, mut gone_rx) = connect(&rooms);
    let (stays, mut stays_rx) = connect(&rooms);

    rooms.join(gone, RoomKey::game("ABC123"));
    rooms.join(stays, RoomKey::game("ABC123"));
    rooms.remove(&gone);

    rooms.broadcast(&RoomKey::game("ABC123"), ServerEvent::GameEnded {});

    assert!(gone_rx.try_recv().is_err());
    assert_eq!(stays_rx.try_recv().unwrap(), ServerEvent::GameEnded {});
}

#[tokio::test]
async fn late_joiners_miss_earlier_broadcasts() {
    let rooms = RoomBroadcaster::new();
    let (early, mut early_rx) = connect(&rooms);
    rooms.join(early, RoomKey::game("ABC123"));

    rooms.broadcast(&RoomKey::game("ABC123"), ServerEvent::GameEnded {});

    let (late, mut late_rx) = connect(&rooms);
    rooms.join(late, RoomKey::game("ABC123"));

    assert_eq!(early_rx.try_recv().unwrap(), ServerEvent::GameEnded {});
    // No replay for connections that joined after the fact.
    assert!(late_rx.try_recv().is_err());
}

#[tokio::test]
async fn a_connection_may_sit_in_multiple_rooms() {
    let rooms = RoomBroadcaster::new();
    let (host, mut host_rx) = connect(&rooms);

    rooms.join(host, RoomKey::host("ABC123"));
    rooms.join(host, RoomKey::game("ABC123"));

    rooms.broadcast(&RoomKey::host("ABC123"), ServerEvent::GameEnded {});
    rooms.broadcast(&RoomKey::game("ABC123"), ServerEvent::GameEnded {});

    assert_eq!(host_rx.try_recv().unwrap(), ServerEvent::GameEnded {});
    assert_eq!(host_rx.try_recv().unwrap(), ServerEvent::GameEnded {});
}
