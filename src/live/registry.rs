use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use rand::Rng;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{common::server_error::ServerError, game::models::GameStatus};

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const COMPLETED_RETENTION: Duration = Duration::from_secs(600);

struct SessionState {
    status: GameStatus,
    ended_at: Option<Instant>,
}

/// One live game session. The mutex around the state is the per-session
/// lock that serializes transitions; it is held across the transition's
/// persistence but never across a broadcast.
pub struct LiveSession {
    pub session_id: Uuid,
    pub quiz_id: Uuid,
    pub admin_id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
}

impl LiveSession {
    fn new(session_id: Uuid, quiz_id: Uuid, admin_id: Uuid, code: String) -> Self {
        Self {
            session_id,
            quiz_id,
            admin_id,
            code,
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                status: GameStatus::Waiting,
                ended_at: None,
            }),
        }
    }

    pub async fn status(&self) -> GameStatus {
        self.state.lock().await.status
    }

    /// waiting -> active. The in-memory status only flips once `persist`
    /// has succeeded, so a failed durable write leaves the session
    /// startable again.
    pub async fn begin<F, Fut>(&self, persist: F) -> Result<(), ServerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ServerError>>,
    {
        let mut lock = self.state.lock().await;
        match lock.status {
            GameStatus::Waiting => {
                persist().await?;
                lock.status = GameStatus::Active;
                Ok(())
            }
            current => Err(ServerError::InvalidTransition(format!(
                "cannot start game {} from status {}",
                self.code, current
            ))),
        }
    }

    /// active -> completed. Tolerates a repeated end on an already
    /// completed session; never moves backward. As with `begin`, the
    /// status only flips after `persist` succeeds.
    pub async fn complete<F, Fut>(&self, persist: F) -> Result<(), ServerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ServerError>>,
    {
        let mut lock = self.state.lock().await;
        match lock.status {
            GameStatus::Active | GameStatus::Completed => {
                persist().await?;
                lock.status = GameStatus::Completed;
                if lock.ended_at.is_none() {
                    lock.ended_at = Some(Instant::now());
                }
                Ok(())
            }
            GameStatus::Waiting => Err(ServerError::InvalidTransition(format!(
                "cannot end game {} before it has started",
                self.code
            ))),
        }
    }

    /// Runs `join` unless the session has completed. The lock is held
    /// across the check and the insert, so an `end_game` racing with a
    /// join cannot admit a participant after the terminal broadcast.
    pub async fn admit<F, Fut, T>(&self, join: F) -> Result<T, ServerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServerError>>,
    {
        let lock = self.state.lock().await;
        if lock.status == GameStatus::Completed {
            return Err(ServerError::GameEnded);
        }
        join().await
    }
}

/// In-memory index of live game sessions, keyed by join code.
pub struct SessionRegistry {
    by_code: DashMap<String, Arc<LiveSession>>,
    by_id: DashMap<Uuid, String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            by_code: DashMap::new(),
            by_id: DashMap::new(),
        }
    }

    /// Registers a fresh waiting session under a newly allocated code.
    /// Collisions against currently-registered codes retry; the entry API
    /// makes the check-and-insert atomic.
    pub fn create(&self, quiz_id: Uuid, admin_id: Uuid) -> Arc<LiveSession> {
        let session_id = Uuid::new_v4();
        loop {
            let code = generate_game_code();
            match self.by_code.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    let session = Arc::new(LiveSession::new(session_id, quiz_id, admin_id, code));
                    entry.insert(session.clone());
                    self.by_id.insert(session_id, session.code.clone());
                    return session;
                }
            }
        }
    }

    /// Registers a session and persists it through `persist`. A failed
    /// durable write evicts the entry again so its code is not burned
    /// and no orphan is left behind for joins to trip over.
    pub async fn create_with<F, Fut>(
        &self,
        quiz_id: Uuid,
        admin_id: Uuid,
        persist: F,
    ) -> Result<Arc<LiveSession>, ServerError>
    where
        F: FnOnce(Arc<LiveSession>) -> Fut,
        Fut: Future<Output = Result<(), ServerError>>,
    {
        let session = self.create(quiz_id, admin_id);
        match persist(session.clone()).await {
            Ok(()) => Ok(session),
            Err(e) => {
                self.evict(&session.code);
                Err(e)
            }
        }
    }

    pub fn find_by_code(&self, code: &str) -> Option<Arc<LiveSession>> {
        self.by_code.get(code).map(|entry| entry.value().clone())
    }

    pub fn find_by_id(&self, session_id: &Uuid) -> Option<Arc<LiveSession>> {
        let code = self.by_id.get(session_id)?.value().clone();
        self.find_by_code(&code)
    }

    /// Drops a session from the registry, freeing its code for reuse.
    /// Final scores live in the database, so only completed sessions
    /// should be evicted.
    pub fn evict(&self, code: &str) -> Option<Arc<LiveSession>> {
        let (_, session) = self.by_code.remove(code)?;
        self.by_id.remove(&session.session_id);
        Some(session)
    }

    /// Evicts completed sessions whose end lies at least `retention` in
    /// the past. Waiting and active sessions are never touched, and a
    /// freshly ended session stays around so late `get_results` calls
    /// still resolve.
    pub async fn sweep_completed(&self, retention: Duration) -> usize {
        let sessions: Vec<(String, Arc<LiveSession>)> = self
            .by_code
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut evicted = 0;
        for (code, session) in sessions {
            let lock = session.state.lock().await;
            let expired = lock.status == GameStatus::Completed
                && lock
                    .ended_at
                    .is_some_and(|ended_at| ended_at.elapsed() >= retention);
            drop(lock);

            if expired && self.evict(&code).is_some() {
                evicted += 1;
            }
        }

        evicted
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}

pub fn generate_game_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}
