//! Countdown engine behavior: ticking, thresholds and the final action.

mod common;

use common::{engine, Effect, RecordingEffects};
use shutaap::{
    services::SoundId,
    state::{EngineError, Phase, SystemActionChoice, ThresholdFlags},
};

#[test]
fn new_engine_is_idle_and_ignores_ticks() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);

    assert_eq!(engine.tick(), Phase::Idle);
    assert_eq!(engine.state().remaining, 0);
    assert!(effects.calls().is_empty());
}

#[test]
fn zero_duration_is_rejected() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);

    assert_eq!(engine.arm(0, SystemActionChoice::Shutdown), Err(EngineError::ZeroDuration));
    assert_eq!(engine.state().phase, Phase::Idle);
    assert!(effects.calls().is_empty());
}

#[test]
fn expires_after_exactly_duration_ticks() {
    for duration in [1, 2, 3, 4, 10, 25, 26, 61, 200] {
        let effects = RecordingEffects::new();
        let mut engine = engine(&effects);
        engine.arm(duration, SystemActionChoice::Sleep).unwrap();

        for step in 1..duration {
            assert_eq!(engine.tick(), Phase::Armed, "expired early at tick {} of {}", step, duration);
        }
        assert_eq!(engine.tick(), Phase::Expired);
        assert_eq!(engine.state().remaining, 0);
        assert_eq!(effects.system_actions(), vec![SystemActionChoice::Sleep]);
    }
}

#[test]
fn thirty_second_scenario() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(30, SystemActionChoice::Shutdown).unwrap();
    assert_eq!(effects.plays_of(SoundId::Ticking), 1);

    for _ in 0..5 {
        engine.tick();
    }
    assert_eq!(engine.state().remaining, 25);
    assert_eq!(effects.count(&Effect::VibrateStart), 1);
    assert_eq!(effects.count(&Effect::Play { sound: SoundId::Countdown, looping: false, seek: 0 }), 1);
    assert_eq!(effects.count(&Effect::Play { sound: SoundId::Alarm, looping: true, seek: 0 }), 1);
    assert!(engine.flags().countdown_sound_started);
    assert!(engine.flags().alarm_started);

    for _ in 0..25 {
        engine.tick();
    }
    assert_eq!(engine.state().phase, Phase::Expired);
    assert_eq!(effects.count(&Effect::VibrateStart), 1);
    assert_eq!(effects.plays_of(SoundId::Countdown), 1);
    assert_eq!(effects.plays_of(SoundId::Alarm), 1);
    assert_eq!(effects.system_actions(), vec![SystemActionChoice::Shutdown]);
}

#[test]
fn impact_fires_once_at_three_seconds() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(10, SystemActionChoice::None).unwrap();

    for _ in 0..7 {
        engine.tick();
    }
    assert_eq!(engine.state().remaining, 3);
    assert!(engine.flags().explosion_fired);
    assert_eq!(effects.plays_of(SoundId::BombBeeps), 1);
    assert_eq!(effects.plays_of(SoundId::Explosion), 1);

    for _ in 0..3 {
        engine.tick();
    }
    assert_eq!(engine.state().phase, Phase::Expired);
    assert_eq!(effects.plays_of(SoundId::Explosion), 1);
}

#[test]
fn three_second_run_fires_impact_at_arm() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(3, SystemActionChoice::Restart).unwrap();

    assert!(engine.flags().explosion_fired);
    assert_eq!(effects.plays_of(SoundId::Explosion), 1);

    engine.tick();
    engine.tick();
    assert_eq!(engine.tick(), Phase::Expired);
    assert_eq!(effects.plays_of(SoundId::Explosion), 1);
    assert_eq!(effects.system_actions(), vec![SystemActionChoice::Restart]);
}

#[test]
fn countdown_sound_is_seeked_to_the_time_left() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(20, SystemActionChoice::None).unwrap();

    // Already 5 seconds into the 25 second band
    assert_eq!(effects.count(&Effect::Play { sound: SoundId::Countdown, looping: false, seek: 5 }), 1);
}

#[test]
fn ticks_after_expiry_change_nothing() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(2, SystemActionChoice::Shutdown).unwrap();
    engine.tick();
    engine.tick();
    let calls = effects.calls().len();

    for _ in 0..10 {
        assert_eq!(engine.tick(), Phase::Expired);
    }
    assert_eq!(engine.state().remaining, 0);
    assert_eq!(effects.calls().len(), calls);
    assert_eq!(effects.system_actions().len(), 1);
}

#[test]
fn rearming_resets_latches_and_vibration() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(5, SystemActionChoice::Shutdown).unwrap();
    engine.tick();
    engine.tick();
    assert!(engine.flags().explosion_fired);
    let first_run = engine.state().run;

    effects.clear();
    engine.arm(60, SystemActionChoice::Sleep).unwrap();

    assert_eq!(engine.flags(), ThresholdFlags::default());
    assert_eq!(engine.state().remaining, 60);
    assert_eq!(engine.state().total, 60);
    assert_eq!(engine.state().run, first_run + 1);
    assert_eq!(engine.action(), SystemActionChoice::Sleep);
    assert_eq!(
        effects.calls()[..3],
        [
            Effect::StopAll,
            Effect::VibrateStop,
            Effect::Play { sound: SoundId::Ticking, looping: true, seek: 0 },
        ]
    );

    // The new run goes through its thresholds again
    for _ in 0..35 {
        engine.tick();
    }
    assert_eq!(effects.count(&Effect::VibrateStart), 1);
}

#[test]
fn added_time_leaves_the_warning_band() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(30, SystemActionChoice::Shutdown).unwrap();
    for _ in 0..10 {
        engine.tick();
    }
    assert!(engine.flags().countdown_sound_started);

    effects.clear();
    engine.add_time(60).unwrap();

    assert_eq!(engine.state().remaining, 80);
    assert_eq!(engine.state().total, 90);
    assert!(!engine.flags().countdown_sound_started);
    assert!(!engine.flags().alarm_started);
    assert_eq!(effects.count(&Effect::VibrateStop), 1);
    assert_eq!(effects.count(&Effect::StopAll), 1);
    assert_eq!(effects.plays_of(SoundId::Ticking), 1);

    // Approaching zero again restarts the alarms
    for _ in 0..55 {
        engine.tick();
    }
    assert_eq!(engine.state().remaining, 25);
    assert_eq!(effects.count(&Effect::VibrateStart), 1);
    assert_eq!(effects.plays_of(SoundId::Alarm), 1);
}

#[test]
fn added_time_inside_the_band_keeps_alarms() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(20, SystemActionChoice::Shutdown).unwrap();
    effects.clear();

    engine.add_time(2).unwrap();
    assert_eq!(engine.state().remaining, 22);
    assert!(engine.flags().countdown_sound_started);
    assert!(effects.calls().is_empty());
}

#[test]
fn add_time_needs_a_running_countdown() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    assert_eq!(engine.add_time(10), Err(EngineError::NotArmed));
}

#[test]
fn disarm_silences_and_returns_to_idle() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    assert!(!engine.disarm());

    engine.arm(15, SystemActionChoice::Shutdown).unwrap();
    effects.clear();
    assert!(engine.disarm());

    assert_eq!(engine.state().phase, Phase::Idle);
    assert_eq!(effects.calls(), vec![Effect::StopAll, Effect::VibrateStop]);
    assert_eq!(engine.tick(), Phase::Idle);
    assert!(effects.system_actions().is_empty());
}

#[test]
fn sound_failures_do_not_stop_the_clock() {
    let effects = RecordingEffects::failing_sounds();
    let mut engine = engine(&effects);
    engine.arm(27, SystemActionChoice::Shutdown).unwrap();

    engine.tick();
    engine.tick();
    assert_eq!(engine.state().remaining, 25);
    assert!(engine.flags().countdown_sound_started);

    engine.tick();
    assert_eq!(engine.state().remaining, 24);

    for _ in 0..24 {
        engine.tick();
    }
    assert_eq!(engine.state().phase, Phase::Expired);
    assert_eq!(effects.system_actions(), vec![SystemActionChoice::Shutdown]);
}

#[test]
fn remaining_never_increases_while_ticking() {
    let effects = RecordingEffects::new();
    let mut engine = engine(&effects);
    engine.arm(40, SystemActionChoice::None).unwrap();

    let mut previous = engine.state().remaining;
    while engine.tick() == Phase::Armed {
        let remaining = engine.state().remaining;
        assert!(remaining < previous);
        assert!(remaining <= engine.state().total);
        previous = remaining;
    }
}
