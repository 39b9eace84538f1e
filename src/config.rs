use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_CANVAS_WIDTH_PX, DEFAULT_FRAMES_PER_PIXEL, DEFAULT_SNAP_THRESHOLD_PX,
    MIN_FRAMES_PER_PIXEL, MIN_SESSION_PIXELS,
};
use crate::core::snap::{SnapMode, SnapType};
use crate::error::Result;
use crate::timeline::ZoomLimits;

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Initial snap grid
    #[serde(default)]
    pub snap_type: SnapType,
    /// Initial snap mode
    #[serde(default)]
    pub snap_mode: SnapMode,
    /// Magnetic pull radius in pixels
    #[serde(default = "default_snap_threshold_px")]
    pub snap_threshold_px: f64,
    /// Zoom floor in frames per pixel
    #[serde(default = "default_min_frames_per_pixel")]
    pub min_frames_per_pixel: f64,
    /// The whole session must span at least this many pixels
    #[serde(default = "default_min_session_pixels")]
    pub min_session_pixels: f64,
    /// Initial zoom level
    #[serde(default = "default_frames_per_pixel")]
    pub frames_per_pixel: f64,
    /// Width of the editor canvas in pixels
    #[serde(default = "default_canvas_width_px")]
    pub canvas_width_px: f64,
}

fn default_snap_threshold_px() -> f64 {
    DEFAULT_SNAP_THRESHOLD_PX
}

fn default_min_frames_per_pixel() -> f64 {
    MIN_FRAMES_PER_PIXEL
}

fn default_min_session_pixels() -> f64 {
    MIN_SESSION_PIXELS
}

fn default_frames_per_pixel() -> f64 {
    DEFAULT_FRAMES_PER_PIXEL
}

fn default_canvas_width_px() -> f64 {
    DEFAULT_CANVAS_WIDTH_PX
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_type: SnapType::default(),
            snap_mode: SnapMode::default(),
            snap_threshold_px: default_snap_threshold_px(),
            min_frames_per_pixel: default_min_frames_per_pixel(),
            min_session_pixels: default_min_session_pixels(),
            frames_per_pixel: default_frames_per_pixel(),
            canvas_width_px: default_canvas_width_px(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace nonsensical values with defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.snap_threshold_px >= 0.0) {
            warn!("snap threshold {} is invalid, using default", self.snap_threshold_px);
            self.snap_threshold_px = default_snap_threshold_px();
        }
        if !(self.min_frames_per_pixel > 0.0) {
            warn!("minimum zoom {} is invalid, using default", self.min_frames_per_pixel);
            self.min_frames_per_pixel = default_min_frames_per_pixel();
        }
        if !(self.min_session_pixels > 0.0) {
            warn!("minimum session width {} is invalid, using default", self.min_session_pixels);
            self.min_session_pixels = default_min_session_pixels();
        }
        if !(self.canvas_width_px >= 1.0) {
            warn!("canvas width {} is invalid, using default", self.canvas_width_px);
            self.canvas_width_px = default_canvas_width_px();
        }
        if !(self.frames_per_pixel >= self.min_frames_per_pixel) {
            warn!(
                "initial zoom {} is below the floor, using {}",
                self.frames_per_pixel, self.min_frames_per_pixel
            );
            self.frames_per_pixel = self.min_frames_per_pixel;
        }
        self
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min_frames_per_pixel: self.min_frames_per_pixel,
            min_session_pixels: self.min_session_pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.snap_mode, SnapMode::Off);
        assert_eq!(config.snap_threshold_px, 5.0);
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(
            r#"{
                "snap_type": "region-boundary",
                "snap_mode": "magnetic",
                "snap_threshold_px": 8.0
            }"#,
        )
        .unwrap();
        assert_eq!(config.snap_type, SnapType::RegionBoundary);
        assert_eq!(config.snap_mode, SnapMode::Magnetic);
        assert_eq!(config.snap_threshold_px, 8.0);
        assert_eq!(config.min_session_pixels, 800.0);
    }

    #[test]
    fn test_sanitize_bad_values() {
        let config = EditorConfig::from_json(
            r#"{ "snap_threshold_px": -1.0, "frames_per_pixel": 0.5, "canvas_width_px": 0.0 }"#,
        )
        .unwrap();
        assert_eq!(config.snap_threshold_px, 5.0);
        assert_eq!(config.frames_per_pixel, 2.0);
        assert_eq!(config.canvas_width_px, 1200.0);
    }

    #[test]
    fn test_unknown_snap_type_is_error() {
        assert!(EditorConfig::from_json(r#"{ "snap_type": "quarter-notes" }"#).is_err());
    }
}
