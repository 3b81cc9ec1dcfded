//! Catalog API handlers.

use axum::{extract::State, http::StatusCode, Json};
use medialist_core::{FilterBy, MediaItem, SortDirection, SortOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Sorted, filtered projection of the latest poll
#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub items: Vec<MediaItem>,
    pub total: usize,
    /// Distinct items ever seen, including ones no longer served
    pub known: usize,
    pub sort: SortOptions,
    pub filter: FilterBy,
}

/// Request body for changing the sort
#[derive(Debug, Deserialize)]
pub struct UpdateSortBody {
    /// Field to sort on
    pub by: Option<String>,
    /// 1 for ascending, -1 for descending
    pub dir: Option<i64>,
}

/// Request body for changing the filter
#[derive(Debug, Deserialize)]
pub struct UpdateFilterBody {
    /// One of `*`, `live`, `offline`, `video`; anything else shows everything
    pub filter: String,
}

// ============================================================================
// Handlers
// ============================================================================

fn media_list(state: &AppState) -> MediaListResponse {
    let catalog = state.app().catalog();
    let items = catalog.read();
    MediaListResponse {
        total: items.len(),
        items,
        known: catalog.len(),
        sort: catalog.sort_options(),
        filter: catalog.filter_by(),
    }
}

/// List the catalog with the current sort and filter applied
pub async fn list_media(State(state): State<Arc<AppState>>) -> Json<MediaListResponse> {
    Json(media_list(&state))
}

/// Change the sort field and/or direction
pub async fn update_sort(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateSortBody>,
) -> Result<Json<MediaListResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Validate before touching the cache so a bad request changes nothing
    let dir = body
        .dir
        .map(SortDirection::try_from)
        .transpose()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?;

    if let Some(by) = &body.by {
        if by.trim().is_empty() {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "sort field cannot be empty",
            ));
        }
    }

    let catalog = state.app().catalog();
    if let Some(by) = body.by {
        catalog.update_sort_by_property(by);
    }
    if let Some(dir) = dir {
        catalog.update_sort_by_dir(dir);
    }
    debug!("Sort is now {:?}", catalog.sort_options());

    Ok(Json(media_list(&state)))
}

/// Change the filter
pub async fn update_filter(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateFilterBody>,
) -> Json<MediaListResponse> {
    state
        .app()
        .catalog()
        .update_filter_by(FilterBy::from_token(&body.filter));
    Json(media_list(&state))
}
