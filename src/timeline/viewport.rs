use crate::core::Position;

/// Horizontal and vertical view geometry of the editor canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// First frame visible at the left edge.
    pub leftmost_frame: Position,
    /// Zoom level.
    pub frames_per_pixel: f64,
    /// Visible canvas width.
    pub canvas_width_px: f64,
    /// Horizontal scroll offset in pixels.
    horizontal_position: f64,
    /// Vertical scroll offset in pixels.
    pub vertical_position: f64,
}

impl Viewport {
    pub fn new(frames_per_pixel: f64, canvas_width_px: f64) -> Self {
        Self {
            leftmost_frame: 0,
            frames_per_pixel,
            canvas_width_px: canvas_width_px.max(1.0),
            horizontal_position: 0.0,
            vertical_position: 0.0,
        }
    }

    pub fn horizontal_position(&self) -> f64 {
        self.horizontal_position
    }

    /// Scroll horizontally; the leftmost frame follows the pixel offset.
    pub fn set_horizontal_position(&mut self, pixel: f64) {
        let pixel = pixel.max(0.0);
        self.horizontal_position = pixel;
        self.leftmost_frame = (pixel * self.frames_per_pixel).round() as Position;
    }

    /// Change zoom keeping the leftmost frame; the pixel offset is re-derived from it.
    pub fn set_frames_per_pixel(&mut self, frames_per_pixel: f64) {
        self.frames_per_pixel = frames_per_pixel;
        self.horizontal_position = self.leftmost_frame as f64 / frames_per_pixel;
    }

    /// Frames covered by one screen width at the current zoom.
    pub fn page_frames(&self) -> Position {
        (self.frames_per_pixel * self.canvas_width_px).floor() as Position
    }

    /// Visible frame range `[start, end)`.
    pub fn visible_range(&self) -> (Position, Position) {
        (
            self.leftmost_frame,
            self.leftmost_frame.saturating_add(self.page_frames()),
        )
    }
}
