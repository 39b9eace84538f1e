use log::debug;
use uuid::Uuid;

use crate::core::Position;

/// Which edge of a region feeds the boundary cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPoint {
    Start,
    End,
    SyncPoint,
    /// Both start and end.
    Boundary,
}

/// Supplies region positions for cache construction.
pub trait RegionBoundarySource {
    /// Positions of `point` for every region on visible tracks in scope.
    ///
    /// An empty `tracks` slice means all tracks.
    fn region_boundaries(&self, point: RegionPoint, tracks: &[Uuid]) -> Vec<Position>;
}

/// Sorted, deduplicated region boundary positions.
///
/// Only `rebuild` changes the contents, and it replaces them wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionBoundaryCache {
    positions: Vec<Position>,
}

impl RegionBoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary positions (sorted and deduplicated here).
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut positions: Vec<Position> = positions.into_iter().collect();
        positions.sort_unstable();
        positions.dedup();
        Self { positions }
    }

    /// Replace the cache with fresh boundaries from `source`.
    pub fn rebuild(
        &mut self,
        source: &dyn RegionBoundarySource,
        point: RegionPoint,
        tracks: &[Uuid],
    ) {
        let fresh = Self::from_positions(source.region_boundaries(point, tracks));
        debug!(
            "rebuilt region boundary cache: {} positions ({:?}, {} scoped tracks)",
            fresh.len(),
            point,
            tracks.len()
        );
        *self = fresh;
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index of the first boundary `>= pos`, or `> pos` when `strict`.
    pub fn insertion_point(&self, pos: Position, strict: bool) -> usize {
        if strict {
            self.positions.partition_point(|&boundary| boundary <= pos)
        } else {
            self.positions.partition_point(|&boundary| boundary < pos)
        }
    }
}
