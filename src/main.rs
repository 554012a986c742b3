use axum::{Router, middleware::from_fn};
use dotenv::dotenv;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::{
    common::app_state::AppState,
    config::config::CONFIG,
    game::handlers::game_routes,
    health::handlers::health_routes,
    live::{
        handlers::live_routes,
        registry::{COMPLETED_RETENTION, SWEEP_INTERVAL},
    },
    mw::request_mw::request_mw,
    quiz::handlers::quiz_routes,
};

mod common;
mod config;
mod game;
mod health;
mod live;
mod mw;
mod quiz;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_connection_string(&CONFIG.database_url)
        .await
        .unwrap_or_else(|e| panic!("{}", e));

    // Background sweep: completed sessions are evicted after a retention
    // window, freeing their codes for reuse.
    tokio::spawn({
        let state = state.clone();
        async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let evicted = state.get_registry().sweep_completed(COMPLETED_RETENTION).await;
                if evicted > 0 {
                    debug!("Evicted {} completed game sessions", evicted);
                }
            }
        }
    });

    // Initialize routes
    let app = Router::new()
        .nest("/health", health_routes(state.clone()))
        .nest("/api/quiz", quiz_routes(state.clone()))
        .nest("/api/game", game_routes(state.clone()))
        .merge(live_routes(state.clone()))
        .layer(from_fn(request_mw));

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap();

    info!(
        "Server listening on address: {}",
        listener.local_addr().unwrap()
    );
    axum::serve(listener, app).await.unwrap();
}
