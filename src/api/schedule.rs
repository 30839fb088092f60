use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::AppState;

/// Time left on the rotation timer
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    /// Milliseconds until the next rotation; 0 when overdue
    pub remaining_ms: u64,
    /// Absolute time of the next rotation, if armed
    pub next_run_at: Option<DateTime<Utc>>,
}

/// Get the rotation schedule
///
/// Clients use this to count down to the next image change.
#[utoipa::path(
    get,
    path = "/api/schedule",
    responses(
        (status = 200, description = "Current schedule", body = ScheduleResponse),
    ),
    tag = "Schedule"
)]
pub async fn get_schedule(State(state): State<AppState>) -> Json<ScheduleResponse> {
    let now = Utc::now();
    Json(ScheduleResponse {
        remaining_ms: state.scheduler.remaining_ms_at(now),
        next_run_at: state.scheduler.next_run_at(),
    })
}
