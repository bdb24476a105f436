//! Background ticker and expiry watcher against the real clock.

mod common;

use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

use common::{app_state, RecordingEffects};
use shutaap::{
    state::{CountdownOptions, Phase, SystemActionChoice},
    tasks::{countdown_ticker_task, expiry_watch_task},
};

fn quick_options() -> CountdownOptions {
    CountdownOptions {
        min_seconds: 1,
        ..CountdownOptions::default()
    }
}

#[tokio::test]
async fn fast_cadence_still_counts_real_seconds() {
    let effects = RecordingEffects::new();
    let state = app_state(&effects, quick_options(), "ticker-cadence");

    tokio::spawn(countdown_ticker_task(Arc::clone(&state), Duration::from_millis(50)));
    state.press(5, SystemActionChoice::Shutdown).unwrap();

    // Twenty wakeups in a second must not eat twenty seconds
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(state.get_countdown().unwrap().remaining, 4);
}

#[tokio::test]
async fn first_second_is_counted_from_the_press() {
    let effects = RecordingEffects::new();
    let state = app_state(&effects, quick_options(), "ticker-first-second");

    tokio::spawn(countdown_ticker_task(Arc::clone(&state), Duration::from_millis(1_000)));
    // Land the press between two ticker wakeups
    tokio::time::sleep(Duration::from_millis(100)).await;
    state.press(10, SystemActionChoice::None).unwrap();

    tokio::time::sleep(Duration::from_millis(1_150)).await;
    assert_eq!(state.get_countdown().unwrap().remaining, 9);

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(state.get_countdown().unwrap().remaining, 8);
}

#[tokio::test]
async fn run_expires_and_watcher_finishes() {
    let effects = RecordingEffects::new();
    let state = app_state(&effects, quick_options(), "ticker-expiry");

    tokio::spawn(countdown_ticker_task(Arc::clone(&state), Duration::from_millis(100)));
    let watcher = tokio::spawn(expiry_watch_task(Arc::clone(&state), Duration::ZERO, false));

    state.press(2, SystemActionChoice::Restart).unwrap();

    timeout(Duration::from_secs(10), watcher)
        .await
        .expect("countdown did not expire in time")
        .unwrap();

    assert_eq!(state.get_countdown().unwrap().phase, Phase::Expired);
    assert_eq!(effects.system_actions(), vec![SystemActionChoice::Restart]);
}
