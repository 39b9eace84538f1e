//! Track selection, which scopes region snapping.

use uuid::Uuid;

/// Tracks the current selection in the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selected track IDs. When non-empty these scope the region boundary cache.
    pub track_ids: Vec<Uuid>,
}

impl SelectionState {
    /// Clear all selections.
    pub fn clear(&mut self) {
        self.track_ids.clear();
    }

    /// Add or remove a track from the selection.
    pub fn toggle_track(&mut self, track_id: Uuid) {
        if self.track_ids.contains(&track_id) {
            self.track_ids.retain(|id| *id != track_id);
        } else {
            self.track_ids.push(track_id);
        }
    }
}
