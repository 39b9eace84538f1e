//! Pending visual change
//!
//! Viewport requests (time origin, zoom, vertical scroll) can arrive many
//! times per UI tick from scroll wheels, drags and playhead follow. They are
//! accumulated here and applied together by a single idle callback.
//!
//! The `scheduled` guard is the central invariant: however many requests
//! arrive before the host runs the idle queue, at most one flush is queued.

use log::{debug, trace};
use std::ops::BitOr;

use crate::core::Position;

use super::idle::{IdleControl, IdleQueue, IdleTask};

/// Bitmask of the fields that have a pending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisualChangeFlags(u8);

impl VisualChangeFlags {
    pub const NONE: Self = Self(0);
    pub const TIME_ORIGIN: Self = Self(1);
    pub const ZOOM_LEVEL: Self = Self(1 << 1);
    pub const Y_ORIGIN: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for VisualChangeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Accumulated, not-yet-applied viewport mutations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingVisualChange {
    pub pending: VisualChangeFlags,
    pub time_origin: Position,
    pub frames_per_pixel: f64,
    pub y_origin: f64,
    scheduled: bool,
}

impl PendingVisualChange {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

/// What a flush did, delivered to visual-change listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualChange {
    /// Fields that were dirty at flush time.
    pub applied: VisualChangeFlags,
    /// False when a dirty zoom was rejected or unchanged.
    pub zoom_applied: bool,
    /// True when the horizontal position did not move and rulers were redrawn anyway.
    pub forced_redraw: bool,
    pub leftmost_frame: Position,
    pub frames_per_pixel: f64,
    pub vertical_position: f64,
}

/// The editor surface a flush applies to.
pub trait VisualChangeTarget {
    /// Horizontal scroll offset in pixels.
    fn horizontal_position(&self) -> f64;

    fn frames_per_pixel(&self) -> f64;

    fn leftmost_frame(&self) -> Position;

    fn vertical_position(&self) -> f64;

    /// Adopt a new origin before any zoom-dependent geometry is computed.
    fn set_leftmost_frame(&mut self, frame: Position);

    /// Apply a zoom level subject to the zoom limits. Returns true if it changed.
    fn set_frames_per_pixel(&mut self, frames_per_pixel: f64) -> bool;

    /// Recompute ruler scale and tempo grid after a zoom request.
    fn zoom_changed(&mut self);

    fn set_horizontal_position(&mut self, pixel: f64);

    fn set_vertical_position(&mut self, y: f64);

    /// Redraw rulers and tempo lines.
    fn redraw_rulers(&mut self);

    /// Notify observers once per flush.
    fn visual_changed(&mut self, change: &VisualChange);
}

/// Coalesces viewport requests into one flush per idle pass.
#[derive(Debug, Default)]
pub struct VisualChangeScheduler {
    pending: PendingVisualChange,
    flushes: u64,
}

impl VisualChangeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingVisualChange {
        &self.pending
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.scheduled
    }

    /// Number of flushes run so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    pub fn request_time_origin(&mut self, pos: Position, idle: &mut dyn IdleQueue) {
        self.pending.pending.insert(VisualChangeFlags::TIME_ORIGIN);
        self.pending.time_origin = pos;
        self.ensure_idle_handler(idle);
    }

    pub fn request_zoom(&mut self, frames_per_pixel: f64, idle: &mut dyn IdleQueue) {
        self.pending.pending.insert(VisualChangeFlags::ZOOM_LEVEL);
        self.pending.frames_per_pixel = frames_per_pixel;
        self.ensure_idle_handler(idle);
    }

    pub fn request_vertical_origin(&mut self, y: f64, idle: &mut dyn IdleQueue) {
        self.pending.pending.insert(VisualChangeFlags::Y_ORIGIN);
        self.pending.y_origin = y;
        self.ensure_idle_handler(idle);
    }

    fn ensure_idle_handler(&mut self, idle: &mut dyn IdleQueue) {
        if !self.pending.scheduled {
            self.pending.scheduled = true;
            idle.add_idle(IdleTask::VisualChange);
            trace!("scheduled visual change flush");
        }
    }

    /// Apply everything pending to `target`. Always one-shot.
    pub fn flush(&mut self, target: &mut dyn VisualChangeTarget) -> IdleControl {
        let flags = std::mem::take(&mut self.pending.pending);
        let last_horizontal_position = target.horizontal_position();

        // Zoom-dependent geometry must see the new origin.
        if flags.contains(VisualChangeFlags::TIME_ORIGIN) {
            target.set_leftmost_frame(self.pending.time_origin);
        }

        let mut zoom_applied = false;
        if flags.contains(VisualChangeFlags::ZOOM_LEVEL) {
            zoom_applied = target.set_frames_per_pixel(self.pending.frames_per_pixel);
            if !zoom_applied {
                debug!(
                    "zoom request {} frames/px not applied",
                    self.pending.frames_per_pixel
                );
            }
            target.zoom_changed();
        }

        if flags.contains(VisualChangeFlags::TIME_ORIGIN) {
            let pixel = self.pending.time_origin as f64 / target.frames_per_pixel();
            target.set_horizontal_position(pixel);
        }

        if flags.contains(VisualChangeFlags::Y_ORIGIN) {
            target.set_vertical_position(self.pending.y_origin);
        }

        // No scroll notification fired, so redraw explicitly.
        let forced_redraw = last_horizontal_position == target.horizontal_position();
        if forced_redraw {
            target.redraw_rulers();
        }

        self.pending.scheduled = false;
        self.flushes += 1;

        let change = VisualChange {
            applied: flags,
            zoom_applied,
            forced_redraw,
            leftmost_frame: target.leftmost_frame(),
            frames_per_pixel: target.frames_per_pixel(),
            vertical_position: target.vertical_position(),
        };
        trace!("visual change flushed: {:?}", change);
        target.visual_changed(&change);

        IdleControl::Remove
    }
}
