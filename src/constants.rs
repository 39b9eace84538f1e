//! Shared editor constants such as snap defaults, zoom limits and ruler sizing.

use crate::core::Position;

/// Sentinel meaning "no boundary in this direction" or an unbounded extent.
pub const MAX_POSITION: Position = Position::MAX;

/// Red Book CD audio addresses 75 frames per second.
pub const CD_FRAMES_PER_SECOND: i64 = 75;

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_TIMECODE_FPS: f64 = 30.0;
pub const DEFAULT_SESSION_LENGTH_SECONDS: i64 = 600;

pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 5.0;
pub const MIN_FRAMES_PER_PIXEL: f64 = 2.0;
pub const MIN_SESSION_PIXELS: f64 = 800.0;
pub const DEFAULT_FRAMES_PER_PIXEL: f64 = 512.0;
pub const DEFAULT_CANVAS_WIDTH_PX: f64 = 1200.0;

pub const RULER_TARGET_PX_PER_TICK: f64 = 90.0;
pub const RULER_MIN_PX_PER_TIMECODE_FRAME: f64 = 4.0;
pub const RULER_NICE_TICK_SECONDS: [f64; 12] = [
    0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0,
];
