//! Timeline view state
//!
//! - Viewport: leftmost frame, zoom and scroll offsets
//! - RulerState: clock ticks and tempo grid for the visible page
//! - VisualChangeScheduler: coalesces viewport requests into one flush
//! - remote: channel for requests coming from other threads

pub mod idle;
pub mod remote;
pub mod ruler;
pub mod viewport;
pub mod visual_change;

pub use idle::{IdleControl, IdleQueue, IdleTask, LocalIdleQueue};
pub use remote::{VisualChangeReceiver, VisualChangeSender, VisualRequest};
pub use ruler::{RulerScale, RulerState};
pub use viewport::Viewport;
pub use visual_change::{
    PendingVisualChange, VisualChange, VisualChangeFlags, VisualChangeScheduler,
    VisualChangeTarget,
};

use crate::constants::MAX_POSITION;
use crate::core::Position;

/// Zoom limits: a frames-per-pixel floor and a minimum on-screen session width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min_frames_per_pixel: f64,
    pub min_session_pixels: f64,
}

impl ZoomLimits {
    /// Frames the zoom floor is measured against. An empty session is unbounded.
    pub fn session_extent(session_length: Position) -> Position {
        if session_length > 0 {
            session_length
        } else {
            MAX_POSITION
        }
    }

    /// Resolve a zoom request.
    ///
    /// `None` means leave the zoom alone: the request equals the current
    /// value, or it would squeeze the session below the minimum width.
    pub fn resolve(&self, requested: f64, current: f64, extent: Position) -> Option<f64> {
        if requested == current {
            return None;
        }
        let frames_per_pixel = requested.max(self.min_frames_per_pixel);
        if extent as f64 / frames_per_pixel < self.min_session_pixels {
            return None;
        }
        Some(frames_per_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ZoomLimits {
        ZoomLimits {
            min_frames_per_pixel: 2.0,
            min_session_pixels: 800.0,
        }
    }

    #[test]
    fn test_resolve_clamps_to_floor() {
        assert_eq!(limits().resolve(0.5, 16.0, 1_000_000), Some(2.0));
    }

    #[test]
    fn test_resolve_rejects_too_wide() {
        // 1_000_000 / 2000 = 500 px < 800 px.
        assert_eq!(limits().resolve(2_000.0, 16.0, 1_000_000), None);
        assert_eq!(limits().resolve(1_250.0, 16.0, 1_000_000), Some(1_250.0));
    }

    #[test]
    fn test_resolve_same_value_is_noop() {
        assert_eq!(limits().resolve(16.0, 16.0, 1_000_000), None);
    }

    #[test]
    fn test_empty_session_is_unbounded() {
        assert_eq!(ZoomLimits::session_extent(0), MAX_POSITION);
        assert_eq!(ZoomLimits::session_extent(480_000), 480_000);
    }
}
