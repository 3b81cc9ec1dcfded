use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medialist_core::{
    create_store, load_config, validate_config, EventKind, HttpMediaSource, MediaEvent,
    MediaListApp, MediaSource,
};
use medialist_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MEDIALIST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Catalog API: {}", config.api.url);
    info!("Storage backend: {:?}", config.storage.backend);

    // Create catalog source
    let source: Arc<dyn MediaSource> = Arc::new(
        HttpMediaSource::new(&config.api).context("Failed to create catalog HTTP client")?,
    );

    // Open key/value store for the watch list
    let store = create_store(&config.storage).context("Failed to open storage")?;

    // Build and wire the client
    let app = Arc::new(MediaListApp::from_config(&config, source, store));
    app.activate();

    // Surface fetch failures to the operator; polling stays stopped until restarted
    app.bus().subscribe(EventKind::PollingFailed, |event| {
        if let MediaEvent::PollingFailed { message, .. } = event {
            warn!(
                "Catalog polling stopped: {}. Use POST /api/v1/polling/restart to resume",
                message
            );
        }
    });

    if app.autostart() {
        app.start();
    } else {
        info!("Polling autostart disabled in config");
    }

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&app)));
    let router = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    app.stop();
    app.watch_list().detach();
    info!("Polling stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
