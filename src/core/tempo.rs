//! Tempo/meter oracle
//!
//! The snap engine never does musical-time math itself. It hands bar, beat
//! and beat-subdivision rounding to a `TempoMap`, passing the direction and
//! subdivision denominator through unchanged.

use serde::{Deserialize, Serialize};

use crate::core::snap::Direction;
use crate::core::Position;

/// A beat line inside a visible range, used for the tempo grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub position: Position,
    /// 1-based bar number.
    pub bar: u32,
    /// 1-based beat within the bar.
    pub beat: u32,
}

impl GridPoint {
    pub fn is_bar(&self) -> bool {
        self.beat == 1
    }
}

/// Musical-time rounding primitives supplied by the session.
pub trait TempoMap {
    fn round_to_bar(&self, pos: Position, direction: Direction) -> Position;

    fn round_to_beat(&self, pos: Position, direction: Direction) -> Position;

    fn round_to_beat_subdivision(
        &self,
        pos: Position,
        subdivision: u32,
        direction: Direction,
    ) -> Position;

    /// Beat lines covering `[start, end)`.
    fn grid_points(&self, start: Position, end: Position) -> Vec<GridPoint>;
}

/// Tempo and meter as stored in a session file.
///
/// Carries no sample rate: frame math always uses the session's rate,
/// through `at_sample_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    /// Quarter-note beats per minute.
    pub bpm: f64,
    /// Time signature numerator.
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: u32,
}

fn default_beats_per_bar() -> u32 {
    4
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            beats_per_bar: default_beats_per_bar(),
        }
    }
}

impl Tempo {
    pub fn at_sample_rate(self, sample_rate: u32) -> ConstantTempoMap {
        ConstantTempoMap {
            tempo: self,
            sample_rate,
        }
    }
}

/// A single tempo and meter for the whole session, bound to a sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantTempoMap {
    pub tempo: Tempo,
    pub sample_rate: u32,
}

impl Default for ConstantTempoMap {
    fn default() -> Self {
        Tempo::default().at_sample_rate(crate::constants::DEFAULT_SAMPLE_RATE)
    }
}

impl ConstantTempoMap {
    pub fn new(bpm: f64, beats_per_bar: u32, sample_rate: u32) -> Self {
        Tempo { bpm, beats_per_bar }.at_sample_rate(sample_rate)
    }

    pub fn frames_per_beat(&self) -> f64 {
        self.sample_rate.max(1) as f64 * 60.0 / self.tempo.bpm.max(1.0)
    }

    pub fn frames_per_bar(&self) -> f64 {
        self.frames_per_beat() * self.tempo.beats_per_bar.max(1) as f64
    }
}

/// Index distance below which a position counts as already on the grid.
const ON_GRID_EPSILON: f64 = 1e-6;

/// Round `pos` onto a grid of `step` frames anchored at zero.
///
/// Nearest only rounds up when strictly past the midpoint.
fn round_to_grid(pos: Position, step: f64, direction: Direction) -> Position {
    if step <= 0.0 {
        return pos;
    }
    let index = pos as f64 / step;
    let nearest = index.round();
    let snapped = if (index - nearest).abs() < ON_GRID_EPSILON {
        nearest
    } else {
        match direction {
            Direction::Forward => index.ceil(),
            Direction::Backward => index.floor(),
            Direction::Nearest => {
                if index - index.floor() > 0.5 {
                    index.ceil()
                } else {
                    index.floor()
                }
            }
        }
    };
    (snapped * step).round() as Position
}

impl TempoMap for ConstantTempoMap {
    fn round_to_bar(&self, pos: Position, direction: Direction) -> Position {
        round_to_grid(pos, self.frames_per_bar(), direction)
    }

    fn round_to_beat(&self, pos: Position, direction: Direction) -> Position {
        round_to_grid(pos, self.frames_per_beat(), direction)
    }

    fn round_to_beat_subdivision(
        &self,
        pos: Position,
        subdivision: u32,
        direction: Direction,
    ) -> Position {
        let step = self.frames_per_beat() / subdivision.max(1) as f64;
        round_to_grid(pos, step, direction)
    }

    fn grid_points(&self, start: Position, end: Position) -> Vec<GridPoint> {
        let step = self.frames_per_beat();
        if end <= start || step <= 0.0 {
            return Vec::new();
        }
        let beats_per_bar = self.tempo.beats_per_bar.max(1) as i64;
        let first = (start.max(0) as f64 / step).ceil() as i64;
        let mut points = Vec::new();
        let mut beat_index = first;
        loop {
            let position = (beat_index as f64 * step).round() as Position;
            if position >= end {
                break;
            }
            points.push(GridPoint {
                position,
                bar: (beat_index / beats_per_bar) as u32 + 1,
                beat: (beat_index % beats_per_bar) as u32 + 1,
            });
            beat_index += 1;
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 120 bpm at 48 kHz: 24000 frames per beat, 96000 per 4/4 bar.
    fn tempo() -> ConstantTempoMap {
        ConstantTempoMap::new(120.0, 4, 48_000)
    }

    #[test]
    fn test_round_to_beat_directions() {
        let map = tempo();
        assert_eq!(map.round_to_beat(30_000, Direction::Nearest), 24_000);
        assert_eq!(map.round_to_beat(37_000, Direction::Nearest), 48_000);
        assert_eq!(map.round_to_beat(30_000, Direction::Forward), 48_000);
        assert_eq!(map.round_to_beat(47_000, Direction::Backward), 24_000);
    }

    #[test]
    fn test_exact_midpoint_rounds_down() {
        let map = tempo();
        assert_eq!(map.round_to_beat(36_000, Direction::Nearest), 24_000);
    }

    #[test]
    fn test_on_grid_positions_stay_put() {
        let map = tempo();
        for direction in [Direction::Backward, Direction::Nearest, Direction::Forward] {
            assert_eq!(map.round_to_beat(48_000, direction), 48_000);
            assert_eq!(map.round_to_bar(96_000, direction), 96_000);
        }
    }

    #[test]
    fn test_subdivision_and_bar() {
        let map = tempo();
        // 1/16 of a beat is 1500 frames.
        assert_eq!(map.round_to_beat_subdivision(2_300, 16, Direction::Nearest), 3_000);
        assert_eq!(map.round_to_beat_subdivision(2_300, 16, Direction::Backward), 1_500);
        assert_eq!(map.round_to_bar(50_000, Direction::Nearest), 96_000);
        assert_eq!(map.round_to_bar(40_000, Direction::Nearest), 0);
    }

    #[test]
    fn test_grid_points_cover_range() {
        let map = tempo();
        let points = map.grid_points(20_000, 100_000);
        let positions: Vec<Position> = points.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![24_000, 48_000, 72_000, 96_000]);
        assert_eq!(points[3].bar, 2);
        assert!(points[3].is_bar());
        assert_eq!(points[0].beat, 2);
    }

    #[test]
    fn test_beat_follows_sample_rate() {
        let map = Tempo::default().at_sample_rate(44_100);
        assert_eq!(map.frames_per_beat(), 22_050.0);
        assert_eq!(map.round_to_beat(22_000, Direction::Nearest), 22_050);
        assert_eq!(map.round_to_bar(100_000, Direction::Nearest), 88_200);
    }

    #[test]
    fn test_grid_points_empty_range() {
        assert!(tempo().grid_points(10, 10).is_empty());
    }
}
