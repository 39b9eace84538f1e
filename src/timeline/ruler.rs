use crate::constants::{
    RULER_MIN_PX_PER_TIMECODE_FRAME, RULER_NICE_TICK_SECONDS, RULER_TARGET_PX_PER_TICK,
};
use crate::core::tempo::{GridPoint, TempoMap};
use crate::core::Position;
use crate::state::TimecodeSettings;

/// Tick spacing for the fixed (clock) rulers at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerScale {
    /// Frames between labelled major ticks.
    pub major_tick_frames: Position,
    /// Frames per timecode frame.
    pub timecode_frame_frames: f64,
    /// Whether individual timecode frames are far enough apart to draw.
    pub show_timecode_frame_ticks: bool,
}

impl RulerScale {
    /// Pick the smallest "nice" interval that keeps major ticks readable.
    pub fn compute(frames_per_pixel: f64, timecode: &TimecodeSettings) -> Self {
        let sample_rate = timecode.sample_rate.max(1) as f64;
        let px_per_second = sample_rate / frames_per_pixel.max(f64::MIN_POSITIVE);
        let target_seconds = RULER_TARGET_PX_PER_TICK / px_per_second;
        let seconds_per_major_tick = RULER_NICE_TICK_SECONDS
            .iter()
            .copied()
            .find(|tick| *tick >= target_seconds)
            .unwrap_or(RULER_NICE_TICK_SECONDS[RULER_NICE_TICK_SECONDS.len() - 1]);

        let timecode_frame_frames = timecode.frames_per_timecode_frame();
        let px_per_timecode_frame = timecode_frame_frames / frames_per_pixel.max(f64::MIN_POSITIVE);

        Self {
            major_tick_frames: (seconds_per_major_tick * sample_rate).round() as Position,
            timecode_frame_frames,
            show_timecode_frame_ticks: px_per_timecode_frame >= RULER_MIN_PX_PER_TIMECODE_FRAME,
        }
    }

    /// Major tick positions in `[start, end)`.
    pub fn major_ticks(&self, start: Position, end: Position) -> Vec<Position> {
        if self.major_tick_frames <= 0 || end <= start {
            return Vec::new();
        }
        let step = self.major_tick_frames;
        let first = start.max(0).div_euclid(step) * step;
        let first = if first < start { first + step } else { first };
        (0..)
            .map(|i| first + i * step)
            .take_while(|tick| *tick < end)
            .collect()
    }
}

/// Derived ruler state recomputed when the view changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerState {
    pub scale: RulerScale,
    /// Beat lines for the visible page.
    pub grid: Vec<GridPoint>,
    /// Major clock ticks for the visible page.
    pub ticks: Vec<Position>,
    redraws: u64,
}

impl RulerState {
    pub fn new(frames_per_pixel: f64, timecode: &TimecodeSettings) -> Self {
        Self {
            scale: RulerScale::compute(frames_per_pixel, timecode),
            grid: Vec::new(),
            ticks: Vec::new(),
            redraws: 0,
        }
    }

    pub fn recompute_scale(&mut self, frames_per_pixel: f64, timecode: &TimecodeSettings) {
        self.scale = RulerScale::compute(frames_per_pixel, timecode);
    }

    pub fn recompute_grid(&mut self, tempo: &dyn TempoMap, start: Position, end: Position) {
        self.grid = tempo.grid_points(start, end);
    }

    /// Refresh tick positions for the visible range.
    pub fn redraw(&mut self, start: Position, end: Position) {
        self.ticks = self.scale.major_ticks(start, end);
        self.redraws += 1;
    }

    /// Number of redraws so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }
}
