//! Signal handling for graceful shutdown

use tracing::{error, info};

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// If the handler cannot be installed this never resolves, leaving expiry
/// as the only way out.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use futures::stream::StreamExt;
    use signal_hook_tokio::Signals;

    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create signal handler: {}", e);
            return std::future::pending().await;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Wait for Ctrl-C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}
