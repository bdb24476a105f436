//! Rendering module
//!
//! Asset loading and the pure geometry a front-end paints the clock with.

pub mod assets;
pub mod frame;

pub use assets::{AssetError, AssetKind, AssetSet};
pub use frame::{render_frame, ClockLayout, Frame, HandPlacement, Point, Size};
