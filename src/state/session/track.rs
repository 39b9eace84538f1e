use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A track in the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Display name (e.g., "Audio 1")
    pub name: String,
    /// Hidden tracks contribute no region boundaries
    #[serde(default)]
    pub hidden: bool,
}

impl Track {
    /// Create a new track
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            hidden: false,
        }
    }
}
