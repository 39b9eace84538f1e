use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::snap::RegionPoint;
use crate::core::Position;

/// A region placed on a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// The track this region is on
    pub track_id: Uuid,
    /// Start position in frames
    pub position: Position,
    /// Length in frames
    pub length: Position,
    /// Sync point, relative to the region start
    #[serde(default)]
    pub sync_offset: Position,
}

impl Region {
    /// Create a new region
    pub fn new(track_id: Uuid, position: Position, length: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            track_id,
            position,
            length,
            sync_offset: 0,
        }
    }

    /// Last frame covered by the region (inclusive).
    pub fn last_frame(&self) -> Position {
        self.position + self.length.max(1) - 1
    }

    pub fn sync_position(&self) -> Position {
        self.position + self.sync_offset
    }

    /// Positions this region contributes for a boundary kind.
    pub fn boundary_positions(&self, point: RegionPoint) -> Vec<Position> {
        match point {
            RegionPoint::Start => vec![self.position],
            RegionPoint::End => vec![self.last_frame()],
            RegionPoint::SyncPoint => vec![self.sync_position()],
            RegionPoint::Boundary => vec![self.position, self.last_frame()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_edges() {
        let mut region = Region::new(Uuid::new_v4(), 100, 50);
        region.sync_offset = 10;
        assert_eq!(region.last_frame(), 149);
        assert_eq!(region.sync_position(), 110);
        assert_eq!(region.boundary_positions(RegionPoint::Boundary), vec![100, 149]);
        assert_eq!(region.boundary_positions(RegionPoint::SyncPoint), vec![110]);
    }
}
