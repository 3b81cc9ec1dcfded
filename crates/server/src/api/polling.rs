//! Polling control API handlers.

use axum::{extract::State, http::StatusCode, Json};
use medialist_core::{MediaEvent, PollStatus};
use serde::Deserialize;
use std::sync::Arc;

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// Longest accepted polling interval (one day)
const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Request body for changing the polling interval
#[derive(Debug, Deserialize)]
pub struct UpdateIntervalBody {
    pub seconds: u64,
}

/// Get the scheduler status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<PollStatus> {
    Json(state.app().scheduler().status())
}

/// Change the polling interval and restart polling
///
/// Goes through the event bus, the same path a UI interval picker uses.
pub async fn update_interval(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateIntervalBody>,
) -> Result<Json<PollStatus>, (StatusCode, Json<ErrorResponse>)> {
    if body.seconds == 0 || body.seconds > MAX_INTERVAL_SECS {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "seconds must be between 1 and {}, got {}",
                MAX_INTERVAL_SECS, body.seconds
            ),
        ));
    }

    state
        .app()
        .bus()
        .publish(MediaEvent::PollingIntervalChanged {
            seconds: body.seconds,
        });

    Ok(Json(state.app().scheduler().status()))
}

/// Restart polling (also recovers from a failed fetch)
pub async fn restart(State(state): State<Arc<AppState>>) -> Json<PollStatus> {
    state.app().scheduler().restart();
    Json(state.app().scheduler().status())
}

/// Stop polling
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<PollStatus> {
    state.app().stop();
    Json(state.app().scheduler().status())
}
