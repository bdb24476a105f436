//! Shutaap - A doomsday clock service
//!
//! This is the main entry point for the shutaap application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use shutaap::{
    config::Config,
    state::AppState,
    api::create_router,
    render::AssetSet,
    services::{check_system_action_available, Dispatcher, SideEffects},
    storage::SettingsStore,
    tasks::{countdown_ticker_task, expiry_watch_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("shutaap={},tower_http=info", config.log_level()))
        .init();

    info!("Starting shutaap v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, warning band={}s, impact at {}s",
          config.host, config.port, config.tick_ms, config.warning_band, config.impact_at);

    // The clock cannot be drawn without its images
    let assets = AssetSet::load(&config.assets_dir, config.scale, config.button_scale)
        .with_context(|| format!("Failed to load assets from {}", config.assets_dir.display()))?;

    let settings = SettingsStore::load(config.settings_path());
    if !config.dry_run {
        if let Err(e) = check_system_action_available(settings.get().action()).await {
            warn!("{}", e);
        }
    }

    let dispatcher: Arc<dyn SideEffects> = Arc::new(Dispatcher::new(config.dispatcher_config()));

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.countdown_options(),
        Arc::clone(&dispatcher),
        settings,
        Arc::new(assets),
    ));

    if config.arm_on_start {
        match state.arm_from_settings() {
            Ok(true) => info!("Armed from saved settings"),
            Ok(false) => {}
            Err(e) => warn!("Could not arm from saved settings: {}", e),
        }
    }

    // Start the countdown ticker background task
    let ticker_state = Arc::clone(&state);
    let tick_interval = config.tick_interval();
    tokio::spawn(async move {
        countdown_ticker_task(ticker_state, tick_interval).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /press        - Press the red button (arm or add time)");
    info!("  POST /cancel       - Cancel the countdown");
    info!("  GET  /status       - Countdown, latches and settings");
    info!("  GET  /frame        - Hand angles and placement for painting");
    info!("  GET  /settings     - Saved duration and system action");
    info!("  GET  /assets/:name - Scaled images as PNG");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        _ = expiry_watch_task(Arc::clone(&state), config.linger(), config.keep_running) => {
            info!("Countdown complete");
        }
    }

    // Silence the clock before exiting
    if let Err(e) = dispatcher.stop_all() {
        warn!("Failed to stop sounds: {}", e);
    }
    if let Err(e) = dispatcher.vibrate_stop() {
        warn!("Failed to stop vibration: {}", e);
    }

    info!("Shutaap shutdown complete");
    Ok(())
}
