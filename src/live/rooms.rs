use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

use crate::live::events::ServerEvent;

pub type ConnectionId = Uuid;

/// Broadcast group key. Each session has a host room (admin connection)
/// and a game room (every participant plus the host).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomKey {
    Host(String),
    Game(String),
}

impl RoomKey {
    pub fn host(code: &str) -> Self {
        RoomKey::Host(code.to_string())
    }

    pub fn game(code: &str) -> Self {
        RoomKey::Game(code.to_string())
    }
}

/// Room-scoped fan-out over per-connection channels. Delivery is
/// best-effort and at-most-once: only connections joined at call time
/// receive an event, and sends to dead connections are dropped.
pub struct RoomBroadcaster {
    connections: DashMap<ConnectionId, UnboundedSender<ServerEvent>>,
    rooms: DashMap<RoomKey, HashSet<ConnectionId>>,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    pub fn register(&self, connection_id: ConnectionId, sender: UnboundedSender<ServerEvent>) {
        self.connections.insert(connection_id, sender);
    }

    /// Removes a connection and its membership in every room. Participant
    /// records and scores are left intact.
    pub fn remove(&self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);
        for mut room in self.rooms.iter_mut() {
            room.value_mut().remove(connection_id);
        }
        self.rooms.retain(|_, members| !members.is_empty());
    }

    /// A connection may belong to multiple rooms; membership is
    /// independent of session status.
    pub fn join(&self, connection_id: ConnectionId, key: RoomKey) {
        self.rooms.entry(key).or_default().insert(connection_id);
    }

    pub fn broadcast(&self, key: &RoomKey, event: ServerEvent) {
        let Some(members) = self.rooms.get(key) else {
            debug!("Broadcast to empty room {:?} dropped", key);
            return;
        };

        for connection_id in members.iter() {
            if let Some(sender) = self.connections.get(connection_id) {
                // A closed channel means the connection is going away.
                let _ = sender.send(event.clone());
            }
        }
    }

    pub fn send_to(&self, connection_id: &ConnectionId, event: ServerEvent) {
        let Some(sender) = self.connections.get(connection_id) else {
            debug!("Send to unknown connection {} dropped", connection_id);
            return;
        };
        let _ = sender.send(event);
    }
}
