//! Timeline Snap
//!
//! Position quantization and viewport change scheduling for a timeline editor.

pub mod config;
pub mod constants;
pub mod core;
pub mod editor;
pub mod error;
pub mod state;
pub mod timeline;

pub use config::EditorConfig;
pub use core::snap::{Direction, Quantizer, SnapMode, SnapType};
pub use core::Position;
pub use editor::Editor;
pub use error::{Result, SnapError};
