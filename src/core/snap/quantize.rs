use crate::constants::{CD_FRAMES_PER_SECOND, MAX_POSITION};
use crate::core::tempo::TempoMap;
use crate::core::Position;
use crate::state::TimecodeSettings;

use super::{Direction, RegionBoundaryCache, SnapMode, SnapType};

/// Finds location marks around a position.
pub trait MarkLocator {
    /// Nearest mark strictly before and strictly after `pos`.
    fn marks_either_side(&self, pos: Position) -> (Option<Position>, Option<Position>);
}

/// Everything the rounding engine reads besides the position itself.
#[derive(Clone, Copy)]
pub struct SnapContext<'a> {
    pub sample_rate: u32,
    pub timecode: TimecodeSettings,
    pub tempo: &'a dyn TempoMap,
    pub marks: &'a dyn MarkLocator,
    pub boundaries: &'a RegionBoundaryCache,
}

/// Round to a whole multiple of `unit` frames.
///
/// Nearest rounds up only when the truncated remainder is past half a unit.
fn round_to_unit(pos: Position, unit: Position, direction: Direction) -> Position {
    if unit <= 0 {
        return pos;
    }
    clamp_position(round_wide(pos as i128, unit as i128, direction))
}

/// Grid math is done in i128 so positions near `MAX_POSITION` cannot overflow.
fn round_wide(pos: i128, unit: i128, direction: Direction) -> i128 {
    let down = pos.div_euclid(unit) * unit;
    let up = if down == pos { down } else { down + unit };
    let round_up = match direction {
        Direction::Forward => true,
        Direction::Nearest => pos % unit > unit / 2,
        Direction::Backward => false,
    };
    if round_up {
        up
    } else {
        down
    }
}

/// Results past either end of the timeline stick to the end.
fn clamp_position(wide: i128) -> Position {
    wide.clamp(Position::MIN as i128, MAX_POSITION as i128) as Position
}

/// Timecode rounding. Only the timecode family may reach this.
///
/// # Panics
///
/// Panics when `snap_type` is not a timecode type; that is a missing case
/// in the caller's dispatch.
pub fn timecode_round(
    snap_type: SnapType,
    timecode: &TimecodeSettings,
    pos: Position,
    direction: Direction,
) -> Position {
    let frames_per_tc_frame = timecode.frames_per_timecode_frame();
    let whole_fps = timecode.fps.round();
    let one_tc_second = (whole_fps * frames_per_tc_frame) as Position;
    let one_tc_minute = (whole_fps * frames_per_tc_frame * 60.0) as Position;

    match snap_type {
        SnapType::TimecodeFrame => {
            let past_half = pos as f64 % frames_per_tc_frame > frames_per_tc_frame / 2.0;
            let round_up = match direction {
                Direction::Forward => true,
                Direction::Nearest => past_half,
                Direction::Backward => false,
            };
            let quotient = pos as f64 / frames_per_tc_frame;
            if round_up {
                (quotient.ceil() * frames_per_tc_frame) as Position
            } else {
                (quotient.floor() * frames_per_tc_frame) as Position
            }
        }
        SnapType::TimecodeSeconds => offset_round(timecode, pos, one_tc_second, direction),
        SnapType::TimecodeMinutes => offset_round(timecode, pos, one_tc_minute, direction),
        other => panic!("timecode rounding called with non-timecode snap type {other:?}"),
    }
}

/// Round in timecode space: remove the offset, round, then put it back.
///
/// A negative offset flips both signs.
fn offset_round(
    timecode: &TimecodeSettings,
    pos: Position,
    unit: Position,
    direction: Direction,
) -> Position {
    if unit <= 0 {
        return pos;
    }
    let offset = if timecode.offset_negative {
        -(timecode.offset as i128)
    } else {
        timecode.offset as i128
    };
    let rounded = round_wide(pos as i128 - offset, unit as i128, direction);
    clamp_position(rounded + offset)
}

fn snap_to_mark(marks: &dyn MarkLocator, pos: Position) -> Position {
    match marks.marks_either_side(pos) {
        (None, Some(after)) => after,
        (Some(before), None) => before,
        (Some(before), Some(after)) => {
            if (pos as i128 - before as i128) < (after as i128 - pos as i128) {
                before
            } else {
                after
            }
        }
        (None, None) => pos,
    }
}

fn snap_to_boundary(cache: &RegionBoundaryCache, pos: Position, direction: Direction) -> Position {
    let boundaries = cache.positions();
    let (Some(&front), Some(&back)) = (boundaries.first(), boundaries.last()) else {
        return pos;
    };

    let next = cache.insertion_point(pos, direction == Direction::Forward);
    let prev = if next > 0 { boundaries[next - 1] } else { front };
    let next = boundaries.get(next).copied().unwrap_or(back);

    let midpoint = ((prev as i128 + next as i128) / 2) as Position;
    if pos > midpoint {
        next
    } else {
        prev
    }
}

/// Pure rounding engine.
///
/// Performs no mode check: callers decide whether quantization is wanted.
pub fn round_position(
    ctx: &SnapContext<'_>,
    snap_type: SnapType,
    pos: Position,
    direction: Direction,
    for_mark: bool,
) -> Position {
    let one_second = ctx.sample_rate as Position;
    let one_minute = one_second * 60;

    match snap_type {
        timecode if timecode.is_timecode() => {
            timecode_round(timecode, &ctx.timecode, pos, direction)
        }
        SnapType::CdFrame => round_to_unit(pos, one_second / CD_FRAMES_PER_SECOND, direction),
        SnapType::Seconds => round_to_unit(pos, one_second, direction),
        SnapType::Minutes => round_to_unit(pos, one_minute, direction),
        SnapType::Bar => ctx.tempo.round_to_bar(pos, direction),
        SnapType::Beat => ctx.tempo.round_to_beat(pos, direction),
        SnapType::Mark => {
            if for_mark {
                pos
            } else {
                snap_to_mark(ctx.marks, pos)
            }
        }
        SnapType::RegionStart
        | SnapType::RegionEnd
        | SnapType::RegionSync
        | SnapType::RegionBoundary => snap_to_boundary(ctx.boundaries, pos, direction),
        other => match other.beat_division() {
            Some(division) => ctx.tempo.round_to_beat_subdivision(pos, division, direction),
            None => unreachable!("snap type {other:?} has no rounding rule"),
        },
    }
}

/// Magnetic post-pass: keep `snapped` only within `threshold` frames of `presnap`.
pub fn apply_magnetic(presnap: Position, snapped: Position, threshold: Position) -> Position {
    if presnap.abs_diff(snapped) > threshold.max(0) as u64 {
        presnap
    } else {
        snapped
    }
}

/// Snap policy: the active type and mode plus the magnetic threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    pub snap_type: SnapType,
    pub snap_mode: SnapMode,
    /// Magnetic pull radius in pixels.
    pub threshold_px: f64,
}

impl Quantizer {
    pub fn new(snap_type: SnapType, snap_mode: SnapMode, threshold_px: f64) -> Self {
        Self {
            snap_type,
            snap_mode,
            threshold_px,
        }
    }

    /// Magnetic radius in frames at the given zoom.
    pub fn threshold_frames(&self, frames_per_pixel: f64) -> Position {
        (self.threshold_px * frames_per_pixel).round() as Position
    }

    /// Snap `pos` unless the mode is Off.
    pub fn snap(
        &self,
        ctx: &SnapContext<'_>,
        pos: Position,
        direction: Direction,
        for_mark: bool,
        frames_per_pixel: f64,
    ) -> Position {
        if self.snap_mode == SnapMode::Off {
            return pos;
        }
        self.snap_internal(ctx, pos, direction, for_mark, frames_per_pixel)
    }

    /// Snap with a held snap modifier inverting the mode check.
    pub fn snap_with_modifier(
        &self,
        ctx: &SnapContext<'_>,
        pos: Position,
        modifier_held: bool,
        direction: Direction,
        for_mark: bool,
        frames_per_pixel: f64,
    ) -> Position {
        let mode_off = self.snap_mode == SnapMode::Off;
        if modifier_held == mode_off {
            self.snap_internal(ctx, pos, direction, for_mark, frames_per_pixel)
        } else {
            pos
        }
    }

    /// Round, then apply the magnetic post-pass when the mode asks for it.
    pub fn snap_internal(
        &self,
        ctx: &SnapContext<'_>,
        pos: Position,
        direction: Direction,
        for_mark: bool,
        frames_per_pixel: f64,
    ) -> Position {
        let snapped = round_position(ctx, self.snap_type, pos, direction, for_mark);
        match self.snap_mode {
            SnapMode::Magnetic => {
                apply_magnetic(pos, snapped, self.threshold_frames(frames_per_pixel))
            }
            SnapMode::Normal | SnapMode::Off => snapped,
        }
    }
}
