//! Session data model
//!
//! The session is the editor's collaborator: it owns tracks, regions,
//! locations and the tempo map, and tells the editor when regions change.

mod location;
mod region;
mod session;
mod settings;
mod track;

pub use location::Location;
pub use region::Region;
pub use session::Session;
pub use settings::{SessionSettings, TimecodeSettings};
pub use track::Track;
