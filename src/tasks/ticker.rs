//! Countdown ticker background task

use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::time::{self, interval, interval_at, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, Phase};

/// Turns wall-clock time into whole logical seconds
///
/// The ticker may wake more often than once a second; only fully elapsed
/// seconds are handed out, the remainder carries over.
#[derive(Debug, Clone)]
pub struct SecondClock {
    anchor: Instant,
}

impl SecondClock {
    pub fn new(now: Instant) -> Self {
        Self { anchor: now }
    }

    /// Start counting from `now`, forgetting any partial second
    pub fn restart(&mut self, now: Instant) {
        self.anchor = now;
    }

    /// Whole seconds elapsed since the last call, keeping the remainder
    pub fn take_whole_seconds(&mut self, now: Instant) -> u64 {
        let seconds = now.saturating_duration_since(self.anchor).as_secs();
        self.anchor += Duration::from_secs(seconds);
        seconds
    }
}

/// Background task that advances the countdown once per elapsed second
///
/// Seconds are counted from the instant the run was armed. The task also
/// wakes on every countdown change so a fresh run is anchored immediately,
/// then re-aligns its interval to that run's second boundaries.
pub async fn countdown_ticker_task(state: Arc<AppState>, tick_interval: Duration) {
    info!("Starting countdown ticker task ({}ms cadence)", tick_interval.as_millis());

    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut countdown_rx = state.subscribe();

    let mut clock = SecondClock::new(Instant::now());
    let mut current_run = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = countdown_rx.changed() => {
                if changed.is_err() {
                    error!("Countdown channel closed, ticker stopping");
                    return;
                }
            }
        }

        let (countdown, armed_at) = match state.get_run_anchor() {
            Ok(anchor) => anchor,
            Err(e) => {
                error!("Failed to read countdown: {}", e);
                continue;
            }
        };

        if !countdown.is_armed() {
            current_run = None;
            continue;
        }

        if current_run != Some(countdown.run) {
            let anchor = armed_at.unwrap_or_else(Instant::now);
            debug!("Ticker picked up run {}", countdown.run);
            current_run = Some(countdown.run);
            clock.restart(anchor);

            ticker = interval_at(time::Instant::from_std(anchor) + tick_interval, tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        for _ in 0..clock.take_whole_seconds(Instant::now()) {
            match state.tick() {
                Ok(Phase::Armed) => {}
                Ok(phase) => {
                    debug!("Ticker stopping for run {}: {:?}", countdown.run, phase);
                    break;
                }
                Err(e) => {
                    error!("Failed to tick countdown: {}", e);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_second_wakeups_yield_one_second_per_two() {
        let start = Instant::now();
        let mut clock = SecondClock::new(start);

        let taken: Vec<u64> = (1..=6)
            .map(|step| clock.take_whole_seconds(start + Duration::from_millis(500 * step)))
            .collect();
        assert_eq!(taken, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn late_wakeup_catches_up() {
        let start = Instant::now();
        let mut clock = SecondClock::new(start);
        assert_eq!(clock.take_whole_seconds(start + Duration::from_millis(3_400)), 3);
        assert_eq!(clock.take_whole_seconds(start + Duration::from_millis(4_000)), 1);
    }

    #[test]
    fn restart_drops_partial_second() {
        let start = Instant::now();
        let mut clock = SecondClock::new(start);
        clock.restart(start + Duration::from_millis(900));
        assert_eq!(clock.take_whole_seconds(start + Duration::from_millis(1_500)), 0);
        assert_eq!(clock.take_whole_seconds(start + Duration::from_millis(1_900)), 1);
    }
}
