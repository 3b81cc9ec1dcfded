use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, media, middleware::metrics_middleware, polling, watchlist};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog
        .route("/media", get(media::list_media))
        .route("/media/sort", put(media::update_sort))
        .route("/media/filter", put(media::update_filter))
        // Watch list
        .route("/watchlist", get(watchlist::list_watch_list))
        .route("/watchlist", post(watchlist::add_to_watch_list))
        .route("/watchlist/{id}", delete(watchlist::remove_from_watch_list))
        // Polling
        .route("/polling", get(polling::get_status))
        .route("/polling/interval", put(polling::update_interval))
        .route("/polling/restart", post(polling::restart))
        .route("/polling/stop", post(polling::stop));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
