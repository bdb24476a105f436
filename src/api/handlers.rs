//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info, warn};

use crate::{
    render::{AssetKind, Frame},
    state::{AppState, PressError},
    storage::Settings,
};
use super::{
    requests::PressRequest,
    responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse},
};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: String) -> HandlerError {
    error!("{}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
}

/// Handle POST /press - The red button: arm or extend the countdown
pub async fn press_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PressRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected press body: {}", rejection.body_text());
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(rejection.body_text())))
    })?;
    let saved_action = state.settings.get().action();

    let press = match request.validate(saved_action) {
        Ok(press) => press,
        Err(e) => {
            warn!("Rejected press: {}", e);
            return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))));
        }
    };

    let outcome = match state.press(press.duration, press.action) {
        Ok(outcome) => outcome,
        Err(PressError::AlreadyRunning) => {
            info!("Press ignored, countdown already running");
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse::new(PressError::AlreadyRunning.to_string())),
            ));
        }
        Err(PressError::Engine(e)) => {
            return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))));
        }
        Err(PressError::Internal(e)) => return Err(internal_error(e)),
    };

    let countdown = state.get_countdown().map_err(internal_error)?;
    Ok(Json(ApiResponse::pressed(outcome, countdown)))
}

/// Handle POST /cancel - Stop the running countdown without any system action
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, HandlerError> {
    let cancelled = state.cancel().map_err(internal_error)?;
    let countdown = state.get_countdown().map_err(internal_error)?;

    let message = if cancelled {
        info!("Cancel endpoint called - countdown stopped");
        "Countdown cancelled"
    } else {
        "No countdown was running"
    };
    Ok(Json(ApiResponse::idle(message.to_string(), countdown)))
}

/// Handle GET /status - Return countdown, latches and settings
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, HandlerError> {
    let (countdown, flags, action) = state.get_snapshot().map_err(internal_error)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        countdown,
        flags,
        action,
        settings: state.settings.get(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /frame - Geometry for painting the clock right now
pub async fn frame_handler(State(state): State<Arc<AppState>>) -> Result<Json<Frame>, HandlerError> {
    state.frame().map(Json).map_err(internal_error)
}

/// Handle GET /settings - The persisted red-button settings
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings.get())
}

/// Handle GET /assets/:name - A scaled image as PNG
pub async fn asset_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let Some(kind) = AssetKind::from_name(&name) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("No asset named '{}'", name))),
        ));
    };

    let png = state.assets.encode_png(kind).map_err(|e| internal_error(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
