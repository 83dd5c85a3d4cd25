use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::logger::{self, LogTag};
use crate::positions::Position;
use crate::trader::{ControlHandle, TraderCommand, TraderStatus};

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub paused: bool,
    pub cycles: u64,
    pub open_positions: usize,
    pub last_cycle_at: Option<String>,
    pub last_error: Option<String>,
}

impl From<&TraderStatus> for StatusResponse {
    fn from(status: &TraderStatus) -> Self {
        Self {
            running: status.running,
            paused: status.paused,
            cycles: status.cycles,
            open_positions: status.open_positions.len(),
            last_cycle_at: status.last_cycle_at.map(|t| t.to_rfc3339()),
            last_error: status.last_error.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PositionsResponse {
    pub count: usize,
    pub positions: Vec<Position>,
}

fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

// =============================================================================
// ROUTE HANDLERS
// =============================================================================

/// GET /api/status
async fn get_status(State(control): State<ControlHandle>) -> Response {
    success_response(StatusResponse::from(&control.status()))
}

/// GET /api/positions
async fn get_positions(State(control): State<ControlHandle>) -> Response {
    let positions = control.status().open_positions;
    success_response(PositionsResponse {
        count: positions.len(),
        positions,
    })
}

/// POST /api/trader/pause
async fn pause_trader(State(control): State<ControlHandle>) -> Response {
    send_command(&control, TraderCommand::Pause).await
}

/// POST /api/trader/resume
async fn resume_trader(State(control): State<ControlHandle>) -> Response {
    send_command(&control, TraderCommand::Resume).await
}

/// Applied at the top of the next worker iteration
async fn send_command(control: &ControlHandle, command: TraderCommand) -> Response {
    match control.send(command).await {
        Ok(()) => {
            logger::info(LogTag::Webserver, &format!("Admin command: {:?}", command));
            success_response(json!({ "accepted": format!("{:?}", command) }))
        }
        Err(e) => error_response(StatusCode::SERVICE_UNAVAILABLE, &e.to_string()),
    }
}

pub fn create_router(control: ControlHandle) -> Router {
    let api = Router::new()
        .route("/status", get(get_status))
        .route("/positions", get(get_positions))
        .route("/trader/pause", post(pause_trader))
        .route("/trader/resume", post(resume_trader));

    Router::new().nest("/api", api).with_state(control)
}
