use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::{
    common::server_error::ServerError,
    live::{registry::SessionRegistry, rooms::RoomBroadcaster},
};

pub struct AppState {
    pool: Pool<Postgres>,
    registry: SessionRegistry,
    rooms: RoomBroadcaster,
}

impl AppState {
    pub async fn from_connection_string(connection_string: &str) -> Result<Arc<Self>, ServerError> {
        let pool = Pool::<Postgres>::connect(connection_string).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to run migrations: {}", e)))?;

        let registry = SessionRegistry::new();
        let rooms = RoomBroadcaster::new();

        let state = Arc::new(Self {
            pool,
            registry,
            rooms,
        });

        Ok(state)
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    pub fn get_registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn get_rooms(&self) -> &RoomBroadcaster {
        &self.rooms
    }
}
