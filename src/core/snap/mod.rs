//! Snap (position quantization)
//!
//! # Architecture
//!
//! - **SnapType**: the active grid granularity
//! - **SnapMode**: whether and how quantization is applied
//! - **round_position()**: pure rounding engine, no mode check
//! - **Quantizer**: policy wrapper that consults the mode and applies the
//!   magnetic post-pass
//! - **RegionBoundaryCache**: sorted region edges for the region snap types

mod boundary_cache;
mod quantize;

pub use boundary_cache::{RegionBoundaryCache, RegionBoundarySource, RegionPoint};
pub use quantize::{
    apply_magnetic, round_position, timecode_round, MarkLocator, Quantizer, SnapContext,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SnapError;

/// Grid granularity used for quantization.
///
/// Variant order is the stable index order used by `from_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapType {
    CdFrame,
    TimecodeFrame,
    TimecodeSeconds,
    TimecodeMinutes,
    Seconds,
    Minutes,
    BeatDiv32,
    BeatDiv28,
    BeatDiv24,
    BeatDiv20,
    BeatDiv16,
    BeatDiv14,
    BeatDiv12,
    BeatDiv10,
    BeatDiv8,
    BeatDiv7,
    BeatDiv6,
    BeatDiv5,
    BeatDiv4,
    BeatDiv3,
    BeatDiv2,
    #[default]
    Beat,
    Bar,
    Mark,
    RegionStart,
    RegionEnd,
    RegionSync,
    RegionBoundary,
}

impl SnapType {
    pub const ALL: [SnapType; 28] = [
        SnapType::CdFrame,
        SnapType::TimecodeFrame,
        SnapType::TimecodeSeconds,
        SnapType::TimecodeMinutes,
        SnapType::Seconds,
        SnapType::Minutes,
        SnapType::BeatDiv32,
        SnapType::BeatDiv28,
        SnapType::BeatDiv24,
        SnapType::BeatDiv20,
        SnapType::BeatDiv16,
        SnapType::BeatDiv14,
        SnapType::BeatDiv12,
        SnapType::BeatDiv10,
        SnapType::BeatDiv8,
        SnapType::BeatDiv7,
        SnapType::BeatDiv6,
        SnapType::BeatDiv5,
        SnapType::BeatDiv4,
        SnapType::BeatDiv3,
        SnapType::BeatDiv2,
        SnapType::Beat,
        SnapType::Bar,
        SnapType::Mark,
        SnapType::RegionStart,
        SnapType::RegionEnd,
        SnapType::RegionSync,
        SnapType::RegionBoundary,
    ];

    /// Look up a snap type by its stable index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Subdivision denominator for the beat-division family.
    pub fn beat_division(self) -> Option<u32> {
        let div = match self {
            SnapType::BeatDiv32 => 32,
            SnapType::BeatDiv28 => 28,
            SnapType::BeatDiv24 => 24,
            SnapType::BeatDiv20 => 20,
            SnapType::BeatDiv16 => 16,
            SnapType::BeatDiv14 => 14,
            SnapType::BeatDiv12 => 12,
            SnapType::BeatDiv10 => 10,
            SnapType::BeatDiv8 => 8,
            SnapType::BeatDiv7 => 7,
            SnapType::BeatDiv6 => 6,
            SnapType::BeatDiv5 => 5,
            SnapType::BeatDiv4 => 4,
            SnapType::BeatDiv3 => 3,
            SnapType::BeatDiv2 => 2,
            _ => return None,
        };
        Some(div)
    }

    pub fn is_timecode(self) -> bool {
        matches!(
            self,
            SnapType::TimecodeFrame | SnapType::TimecodeSeconds | SnapType::TimecodeMinutes
        )
    }

    /// True for the four types that snap against the region boundary cache.
    pub fn is_region_based(self) -> bool {
        self.region_point().is_some()
    }

    pub fn region_point(self) -> Option<RegionPoint> {
        match self {
            SnapType::RegionStart => Some(RegionPoint::Start),
            SnapType::RegionEnd => Some(RegionPoint::End),
            SnapType::RegionSync => Some(RegionPoint::SyncPoint),
            SnapType::RegionBoundary => Some(RegionPoint::Boundary),
            _ => None,
        }
    }

    /// Display name shown in snap selectors.
    pub fn label(self) -> &'static str {
        match self {
            SnapType::CdFrame => "CD Frames",
            SnapType::TimecodeFrame => "Timecode Frames",
            SnapType::TimecodeSeconds => "Timecode Seconds",
            SnapType::TimecodeMinutes => "Timecode Minutes",
            SnapType::Seconds => "Seconds",
            SnapType::Minutes => "Minutes",
            SnapType::BeatDiv32 => "Beats/32",
            SnapType::BeatDiv28 => "Beats/28",
            SnapType::BeatDiv24 => "Beats/24",
            SnapType::BeatDiv20 => "Beats/20",
            SnapType::BeatDiv16 => "Beats/16",
            SnapType::BeatDiv14 => "Beats/14",
            SnapType::BeatDiv12 => "Beats/12",
            SnapType::BeatDiv10 => "Beats/10",
            SnapType::BeatDiv8 => "Beats/8",
            SnapType::BeatDiv7 => "Beats/7",
            SnapType::BeatDiv6 => "Beats/6",
            SnapType::BeatDiv5 => "Beats/5",
            SnapType::BeatDiv4 => "Beats/4",
            SnapType::BeatDiv3 => "Beats/3",
            SnapType::BeatDiv2 => "Beats/2",
            SnapType::Beat => "Beats",
            SnapType::Bar => "Bars",
            SnapType::Mark => "Marks",
            SnapType::RegionStart => "Region starts",
            SnapType::RegionEnd => "Region ends",
            SnapType::RegionSync => "Region syncs",
            SnapType::RegionBoundary => "Region bounds",
        }
    }
}

impl fmt::Display for SnapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for SnapType {
    type Error = SnapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SnapType::from_index(value as usize)
            .ok_or_else(|| SnapError::UnknownSnapType(value.to_string()))
    }
}

impl FromStr for SnapType {
    type Err = SnapError;

    /// Accepts either the display label ("Beats/16") or the config name ("beat-div16").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(found) = SnapType::ALL
            .iter()
            .find(|snap| snap.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*found);
        }
        serde_json::from_value(serde_json::Value::String(trimmed.to_string()))
            .map_err(|_| SnapError::UnknownSnapType(trimmed.to_string()))
    }
}

/// How quantization is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapMode {
    /// No quantization.
    #[default]
    Off,
    /// Always quantize.
    Normal,
    /// Quantize only within the magnetic threshold of the grid.
    Magnetic,
}

impl SnapMode {
    pub fn label(self) -> &'static str {
        match self {
            SnapMode::Off => "No Grid",
            SnapMode::Normal => "Grid",
            SnapMode::Magnetic => "Magnetic",
        }
    }
}

impl FromStr for SnapMode {
    type Err = SnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "no grid" => Ok(SnapMode::Off),
            "normal" | "grid" => Ok(SnapMode::Normal),
            "magnetic" => Ok(SnapMode::Magnetic),
            other => Err(SnapError::UnknownSnapMode(other.to_string())),
        }
    }
}

/// Rounding direction for a snap query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Round down to the previous boundary.
    Backward,
    /// Round to the nearest boundary.
    #[default]
    Nearest,
    /// Round up to the next boundary.
    Forward,
}

impl Direction {
    /// Map a signed direction (`<0`, `0`, `>0`) onto a variant.
    pub fn from_sign(direction: i32) -> Self {
        match direction.signum() {
            -1 => Direction::Backward,
            1 => Direction::Forward,
            _ => Direction::Nearest,
        }
    }

    pub fn signum(self) -> i32 {
        match self {
            Direction::Backward => -1,
            Direction::Nearest => 0,
            Direction::Forward => 1,
        }
    }
}

impl From<i32> for Direction {
    fn from(direction: i32) -> Self {
        Direction::from_sign(direction)
    }
}
