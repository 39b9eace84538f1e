use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Position;

/// A named location: a mark when start equals end, a range otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Start position in frames
    pub start: Position,
    /// End position in frames (equal to start for marks)
    pub end: Position,
    /// Optional label
    #[serde(default)]
    pub name: Option<String>,
}

impl Location {
    /// Create a mark at the given position
    pub fn mark(position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: position,
            end: position,
            name: None,
        }
    }

    /// Create a range location
    pub fn range(start: Position, end: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: start.min(end),
            end: start.max(end),
            name: None,
        }
    }

    /// Create a mark with a label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_mark(&self) -> bool {
        self.start == self.end
    }
}
