use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SAMPLE_RATE, DEFAULT_SESSION_LENGTH_SECONDS, DEFAULT_TIMECODE_FPS};
use crate::core::Position;

/// Session-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Audio sample rate (frames per second)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Timecode rate (e.g. 24, 25, 29.97, 30)
    #[serde(default = "default_timecode_fps")]
    pub timecode_fps: f64,
    /// Timecode offset in frames
    #[serde(default)]
    pub timecode_offset: Position,
    /// True when the timecode offset runs before session start
    #[serde(default)]
    pub timecode_offset_negative: bool,
    /// Session length in frames
    #[serde(default = "default_length")]
    pub length: Position,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_timecode_fps() -> f64 {
    DEFAULT_TIMECODE_FPS
}

fn default_length() -> Position {
    DEFAULT_SESSION_LENGTH_SECONDS * DEFAULT_SAMPLE_RATE as Position
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            timecode_fps: default_timecode_fps(),
            timecode_offset: 0,
            timecode_offset_negative: false,
            length: default_length(),
        }
    }
}

impl SessionSettings {
    /// Timecode view of these settings, as read by the snap engine.
    pub fn timecode(&self) -> TimecodeSettings {
        TimecodeSettings {
            sample_rate: self.sample_rate,
            fps: self.timecode_fps,
            offset: self.timecode_offset,
            offset_negative: self.timecode_offset_negative,
        }
    }
}

/// Timecode rate and offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimecodeSettings {
    pub sample_rate: u32,
    pub fps: f64,
    pub offset: Position,
    pub offset_negative: bool,
}

impl TimecodeSettings {
    pub fn new(sample_rate: u32, fps: f64) -> Self {
        Self {
            sample_rate,
            fps,
            offset: 0,
            offset_negative: false,
        }
    }

    /// Audio frames per timecode frame (fractional for 29.97 and friends).
    pub fn frames_per_timecode_frame(&self) -> f64 {
        self.sample_rate as f64 / self.fps.max(1.0)
    }
}
