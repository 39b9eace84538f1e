use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::core::snap::{Direction, MarkLocator, RegionBoundarySource, RegionPoint};
use crate::core::tempo::{ConstantTempoMap, GridPoint, Tempo, TempoMap};
use crate::core::Position;
use crate::error::Result;
use super::{Location, Region, SessionSettings, Track};

/// The session model the editor snaps against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session name
    #[serde(default = "default_name")]
    pub name: String,
    /// Session settings (sample rate, timecode, length)
    #[serde(default)]
    pub settings: SessionSettings,
    /// Tempo and meter
    #[serde(default)]
    pub tempo: Tempo,
    /// All tracks (ordered top to bottom)
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// All regions placed on tracks
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Marks and ranges, kept sorted by start
    #[serde(default)]
    pub locations: Vec<Location>,

    /// Bumped on every structural region change (not serialized)
    #[serde(skip)]
    region_generation: u64,
}

fn default_name() -> String {
    "Untitled Session".to_string()
}

impl Default for Session {
    fn default() -> Self {
        Self {
            name: default_name(),
            settings: SessionSettings::default(),
            tempo: Tempo::default(),
            tracks: vec![Track::new("Audio 1")],
            regions: Vec::new(),
            locations: Vec::new(),
            region_generation: 0,
        }
    }
}

impl Session {
    /// Create a new session with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Load a session description from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut session: Session = serde_json::from_str(json)?;
        session.sort_locations();
        Ok(session)
    }

    /// Counter that changes whenever the region set changes.
    pub fn region_generation(&self) -> u64 {
        self.region_generation
    }

    fn regions_changed(&mut self) {
        self.region_generation = self.region_generation.wrapping_add(1);
    }

    fn sort_locations(&mut self) {
        self.locations.sort_by_key(|location| location.start);
    }

    /// The tempo map at this session's sample rate.
    pub fn tempo_map(&self) -> ConstantTempoMap {
        self.tempo.at_sample_rate(self.settings.sample_rate)
    }

    /// Session length in frames
    pub fn length(&self) -> Position {
        self.settings.length.max(0)
    }

    /// Find a track by ID
    pub fn find_track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Find a region by ID
    pub fn find_region(&self, id: Uuid) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Add a new track and return its id
    pub fn add_track(&mut self) -> Uuid {
        let track = Track::new(format!("Audio {}", self.tracks.len() + 1));
        let id = track.id;
        self.tracks.push(track);
        id
    }

    /// Remove a track by ID along with its regions
    pub fn remove_track(&mut self, id: Uuid) -> bool {
        let len = self.tracks.len();
        self.tracks.retain(|t| t.id != id);
        if self.tracks.len() == len {
            return false;
        }
        self.regions.retain(|r| r.track_id != id);
        self.regions_changed();
        true
    }

    /// Hide or show a track. Hidden tracks drop out of the boundary set.
    pub fn set_track_hidden(&mut self, id: Uuid, hidden: bool) -> bool {
        let Some(track) = self.tracks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if track.hidden != hidden {
            track.hidden = hidden;
            self.regions_changed();
        }
        true
    }

    /// Get all regions on a specific track
    pub fn regions_on_track(&self, track_id: Uuid) -> Vec<&Region> {
        self.regions.iter().filter(|r| r.track_id == track_id).collect()
    }

    /// Add a region to the session
    pub fn add_region(&mut self, region: Region) -> Uuid {
        let id = region.id;
        self.regions.push(region);
        self.regions_changed();
        id
    }

    /// Remove a region by ID
    pub fn remove_region(&mut self, id: Uuid) -> bool {
        let len = self.regions.len();
        self.regions.retain(|r| r.id != id);
        let removed = self.regions.len() < len;
        if removed {
            self.regions_changed();
        }
        removed
    }

    /// Move a region to a new start position
    pub fn move_region(&mut self, id: Uuid, new_position: Position) -> bool {
        let Some(region) = self.regions.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        region.position = new_position.max(0);
        self.regions_changed();
        true
    }

    /// Resize a region (change start and/or length)
    pub fn resize_region(
        &mut self,
        id: Uuid,
        new_position: Position,
        new_length: Position,
    ) -> bool {
        let Some(region) = self.regions.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        region.position = new_position.max(0);
        region.length = new_length.max(1);
        region.sync_offset = region.sync_offset.clamp(0, region.length - 1);
        self.regions_changed();
        true
    }

    /// Set a region's sync point relative to its start
    pub fn set_region_sync_offset(&mut self, id: Uuid, sync_offset: Position) -> bool {
        let Some(region) = self.regions.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        region.sync_offset = sync_offset.clamp(0, region.length.max(1) - 1);
        self.regions_changed();
        true
    }

    /// Add a mark or range
    pub fn add_location(&mut self, location: Location) -> Uuid {
        let id = location.id;
        self.locations.push(location);
        self.sort_locations();
        id
    }

    /// Move a location to a new start, keeping its length
    pub fn move_location(&mut self, id: Uuid, new_start: Position) -> bool {
        let Some(location) = self.locations.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        let span = location.end - location.start;
        location.start = new_start.max(0);
        location.end = location.start + span;
        self.sort_locations();
        true
    }

    /// Remove a location by ID
    pub fn remove_location(&mut self, id: Uuid) -> bool {
        let len = self.locations.len();
        self.locations.retain(|l| l.id != id);
        self.locations.len() < len
    }
}

impl MarkLocator for Session {
    /// Ranges contribute both ends.
    fn marks_either_side(&self, pos: Position) -> (Option<Position>, Option<Position>) {
        let mut before: Option<Position> = None;
        let mut after: Option<Position> = None;
        for location in &self.locations {
            let ends = if location.is_mark() {
                [Some(location.start), None]
            } else {
                [Some(location.start), Some(location.end)]
            };
            for candidate in ends.into_iter().flatten() {
                if candidate < pos && before.map_or(true, |b| candidate > b) {
                    before = Some(candidate);
                }
                if candidate > pos && after.map_or(true, |a| candidate < a) {
                    after = Some(candidate);
                }
            }
        }
        (before, after)
    }
}

impl RegionBoundarySource for Session {
    fn region_boundaries(&self, point: RegionPoint, tracks: &[Uuid]) -> Vec<Position> {
        self.tracks
            .iter()
            .filter(|track| !track.hidden)
            .filter(|track| tracks.is_empty() || tracks.contains(&track.id))
            .flat_map(|track| self.regions_on_track(track.id))
            .flat_map(|region| region.boundary_positions(point))
            .collect()
    }
}

impl TempoMap for Session {
    fn round_to_bar(&self, pos: Position, direction: Direction) -> Position {
        self.tempo_map().round_to_bar(pos, direction)
    }

    fn round_to_beat(&self, pos: Position, direction: Direction) -> Position {
        self.tempo_map().round_to_beat(pos, direction)
    }

    fn round_to_beat_subdivision(
        &self,
        pos: Position,
        subdivision: u32,
        direction: Direction,
    ) -> Position {
        self.tempo_map()
            .round_to_beat_subdivision(pos, subdivision, direction)
    }

    fn grid_points(&self, start: Position, end: Position) -> Vec<GridPoint> {
        self.tempo_map().grid_points(start, end)
    }
}
