//! Post-expiry cleanup background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Wait for a run to expire, let its system action finish, then silence the
/// sounds after `linger`. Returns after the first expiry unless `keep_running`.
pub async fn expiry_watch_task(state: Arc<AppState>, linger: Duration, keep_running: bool) {
    info!("Starting expiry watch task");

    let mut countdown_rx = state.subscribe();

    loop {
        let expired = countdown_rx
            .wait_for(|countdown| countdown.is_expired())
            .await
            .map(|countdown| countdown.run);
        let run = match expired {
            Ok(run) => run,
            Err(e) => {
                error!("Countdown channel closed: {}", e);
                return;
            }
        };

        for handle in state.effects.take_pending_actions() {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("System action failed: {}", e),
                Err(e) => error!("System action task failed: {}", e),
            }
        }

        // Let the explosion play out
        sleep(linger).await;

        match state.get_countdown() {
            Ok(countdown) if countdown.is_expired() && countdown.run == run => {
                if let Err(e) = state.effects.stop_all() {
                    warn!("Failed to stop sounds after expiry: {}", e);
                }
            }
            Ok(_) => info!("Countdown re-armed during linger, leaving sounds alone"),
            Err(e) => error!("Failed to read countdown: {}", e),
        }

        if !keep_running {
            info!("Run {} finished", run);
            return;
        }

        // Wait for the next run before watching again
        let rearmed = countdown_rx
            .wait_for(|countdown| countdown.run != run)
            .await
            .map(|_| ());
        if let Err(e) = rearmed {
            error!("Countdown channel closed: {}", e);
            return;
        }
    }
}
