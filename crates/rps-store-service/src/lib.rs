//! RPS Store Service
//!
//! An in-memory record store exposed over HTTP, so independent player, judge
//! and reader processes can share one store during development.

mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

use handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/records", post(write_record))
        .route("/records/search", post(search_records))
        .route("/shares", post(share_records))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
