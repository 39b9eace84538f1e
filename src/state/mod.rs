//! State management module
//!
//! - Session: tracks, regions, locations, tempo and settings
//! - SelectionState: what the user has selected, used to scope snapping

mod selection;
mod session;

pub use selection::*;
pub use session::*;
