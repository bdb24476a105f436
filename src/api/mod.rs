//! HTTP API module
//!
//! The red button and the clock's read side: handlers, request validation
//! and response structures.

pub mod handlers;
pub mod requests;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/press", post(press_handler))
        .route("/cancel", post(cancel_handler))
        .route("/status", get(status_handler))
        .route("/frame", get(frame_handler))
        .route("/settings", get(settings_handler))
        .route("/assets/:name", get(asset_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
