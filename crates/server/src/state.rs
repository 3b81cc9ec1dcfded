use medialist_core::{Config, MediaListApp, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    app: Arc<MediaListApp>,
}

impl AppState {
    pub fn new(config: Config, app: Arc<MediaListApp>) -> Self {
        Self { config, app }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// The media-list client served by this process.
    pub fn app(&self) -> &MediaListApp {
        self.app.as_ref()
    }
}
