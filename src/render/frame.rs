//! Render layer: where the hands point and where they are drawn

use serde::{Deserialize, Serialize};

use crate::state::{CountdownState, Phase, WindowOffset};

/// Seconds per revolution of the slow hand
const SLOW_HAND_CYCLE: u64 = 3600;
/// Seconds per revolution of the fast hand
const FAST_HAND_CYCLE: u64 = 60;

/// The face art's center sits slightly above the geometric center
const FACE_CENTER_LIFT: i32 = 8;
const HOUR_HAND_LIFT: i32 = 15;
const MINUTE_HAND_LIFT: i32 = 22;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Scaled sizes of the face and hands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockLayout {
    pub face: Size,
    pub hour_hand: Size,
    pub minute_hand: Size,
}

/// Where to draw one hand
///
/// Translate to `pivot`, rotate by `angle` degrees clockwise, then draw the
/// hand image with its top-left corner at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPlacement {
    pub angle: f64,
    pub pivot: Point,
    pub origin: Point,
    pub size: Size,
}

/// Everything a front-end needs to paint one frame of the clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub phase: Phase,
    pub remaining: u64,
    pub total: u64,
    pub label: String,
    pub face: Size,
    pub slow_hand: HandPlacement,
    pub fast_hand: HandPlacement,
    /// Height fraction of the rising overlay, 0 at arm and 1 at expiry
    pub fill_fraction: f64,
    pub window_offset: WindowOffset,
}

/// Slow and fast hand angles in degrees, both in `[0, 360)`
pub fn hand_angles(remaining: u64) -> (f64, f64) {
    let cycle = remaining % SLOW_HAND_CYCLE;
    let slow = 360.0 * cycle as f64 / SLOW_HAND_CYCLE as f64;
    let fast = 360.0 * (cycle % FAST_HAND_CYCLE) as f64 / FAST_HAND_CYCLE as f64;
    (slow, fast)
}

/// Elapsed share of the run, clamped to `[0, 1]`
pub fn fill_fraction(remaining: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (1.0 - remaining as f64 / total as f64).clamp(0.0, 1.0)
}

/// `MM:SS`, or `H:MM:SS` once an hour or more remains
pub fn format_label(remaining: u64) -> String {
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

fn place_hand(angle: f64, pivot: Point, size: Size) -> HandPlacement {
    let width = size.width as i32;
    let height = size.height as i32;

    HandPlacement {
        angle,
        pivot,
        origin: Point {
            x: (-width).div_euclid(2),
            y: -height,
        },
        size,
    }
}

/// Compute the frame for `state`; pure
pub fn render_frame(state: &CountdownState, layout: &ClockLayout, window_offset: WindowOffset) -> Frame {
    let (slow_angle, fast_angle) = hand_angles(state.remaining);

    let center_x = layout.face.width as i32 / 2;
    let center_y = layout.face.height as i32 / 2 - FACE_CENTER_LIFT;

    let hour_pivot = Point {
        x: center_x,
        y: center_y - HOUR_HAND_LIFT + layout.hour_hand.height as i32 / 2,
    };
    let minute_pivot = Point {
        x: center_x,
        y: center_y - MINUTE_HAND_LIFT + layout.minute_hand.height as i32 / 2 - MINUTE_HAND_LIFT,
    };

    Frame {
        phase: state.phase,
        remaining: state.remaining,
        total: state.total,
        label: format_label(state.remaining),
        face: layout.face,
        slow_hand: place_hand(slow_angle, hour_pivot, layout.hour_hand),
        fast_hand: place_hand(fast_angle, minute_pivot, layout.minute_hand),
        fill_fraction: fill_fraction(state.remaining, state.total),
        window_offset,
    }
}
