//! HTTP transport for the farm game.
//!
//! [`build_router`] exposes the session operations of
//! [`farm_runtime::RuntimeHandle`] as a JSON API consumed by the browser
//! client. Every response except `/health` is wrapped in
//! [`envelope::ApiResponse`].

pub mod config;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use farm_runtime::RuntimeHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub runtime: RuntimeHandle,
}

impl AppState {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/players", post(routes::create_player))
        .route(
            "/api/players/{id}",
            get(routes::get_player).delete(routes::delete_player),
        )
        .route("/api/players/{id}/use-tool", post(routes::use_tool))
        .route("/api/players/{id}/game-state", put(routes::update_game_state))
        .route("/api/players/{id}/update-crops", post(routes::update_crops))
        .route("/api/players/{id}/rest", post(routes::rest))
        .route("/api/players/{id}/pick-tile", post(routes::pick_tile))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
