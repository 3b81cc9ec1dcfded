//! Watch list API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use medialist_core::{MediaId, StorageError, WatchEntry, WatchListItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

/// Request body for adding to the watch list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWatchListBody {
    #[serde(alias = "media_id")]
    pub media_id: MediaId,
}

/// Watch list contents
#[derive(Debug, Serialize)]
pub struct WatchListResponse {
    /// Entries resolved against the catalog, in watch order
    pub items: Vec<WatchListItem>,
    /// Every persisted entry, resolved or not
    pub entries: Vec<WatchEntry>,
}

fn watch_list_response(state: &AppState) -> WatchListResponse {
    let watch_list = state.app().watch_list();
    WatchListResponse {
        items: watch_list.view(),
        entries: watch_list.entries(),
    }
}

fn storage_error(e: StorageError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        StorageError::Unavailable(_) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        StorageError::Serialization(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Get the watch list
pub async fn list_watch_list(State(state): State<Arc<AppState>>) -> Json<WatchListResponse> {
    Json(watch_list_response(&state))
}

/// Add an item to the watch list
pub async fn add_to_watch_list(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddToWatchListBody>,
) -> Result<(StatusCode, Json<WatchListResponse>), (StatusCode, Json<ErrorResponse>)> {
    state
        .app()
        .watch_list()
        .add(body.media_id)
        .map_err(storage_error)?;

    Ok((StatusCode::CREATED, Json(watch_list_response(&state))))
}

/// Remove every entry for an item from the watch list
pub async fn remove_from_watch_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WatchListResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .app()
        .watch_list()
        .remove(&MediaId::from(id))
        .map_err(storage_error)?;

    Ok(Json(watch_list_response(&state)))
}
