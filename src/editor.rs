//! Editor context
//!
//! Owns the snap policy, the region boundary cache, the viewport and the
//! pending visual change. Everything here runs on the UI thread; other
//! threads reach the viewport through `visual_sender()`.

use log::{debug, info};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::core::snap::{
    Direction, Quantizer, RegionBoundaryCache, SnapContext, SnapMode, SnapType,
};
use crate::core::tempo::TempoMap;
use crate::core::Position;
use crate::state::{SelectionState, Session};
use crate::timeline::remote::{self, VisualChangeReceiver, VisualChangeSender, VisualRequest};
use crate::timeline::{
    IdleControl, IdleQueue, IdleTask, LocalIdleQueue, RulerState, Viewport, VisualChange,
    VisualChangeScheduler, VisualChangeTarget, ZoomLimits,
};

type VisualChangeListener = Box<dyn FnMut(&VisualChange)>;

pub struct Editor {
    config: EditorConfig,
    session: Session,
    selection: SelectionState,
    quantizer: Quantizer,
    boundaries: RegionBoundaryCache,
    viewport: Viewport,
    rulers: RulerState,
    visual: VisualChangeScheduler,
    idle: LocalIdleQueue,
    remote_tx: VisualChangeSender,
    remote_rx: VisualChangeReceiver,
    listeners: Vec<VisualChangeListener>,
}

impl Editor {
    pub fn new(session: Session, config: EditorConfig) -> Self {
        let config = config.sanitized();
        let quantizer =
            Quantizer::new(config.snap_type, config.snap_mode, config.snap_threshold_px);
        let viewport = Viewport::new(config.frames_per_pixel, config.canvas_width_px);
        let rulers = RulerState::new(viewport.frames_per_pixel, &session.settings.timecode());
        let (remote_tx, remote_rx) = remote::channel();

        let mut editor = Self {
            config,
            session,
            selection: SelectionState::default(),
            quantizer,
            boundaries: RegionBoundaryCache::new(),
            viewport,
            rulers,
            visual: VisualChangeScheduler::new(),
            idle: LocalIdleQueue::new(),
            remote_tx,
            remote_rx,
            listeners: Vec::new(),
        };
        editor.canvas().zoom_changed();
        editor.canvas().redraw_rulers();
        if editor.quantizer.snap_type.is_region_based() {
            editor.build_region_boundary_cache();
        }
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutate the session. A region-set change is picked up afterwards.
    pub fn edit_session<R>(&mut self, edit: impl FnOnce(&mut Session) -> R) -> R {
        let generation = self.session.region_generation();
        let result = edit(&mut self.session);
        if self.session.region_generation() != generation {
            self.region_set_changed();
        }
        result
    }

    // =========================================================================
    // Snap settings
    // =========================================================================

    pub fn snap_type(&self) -> SnapType {
        self.quantizer.snap_type
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.quantizer.snap_mode
    }

    pub fn snap_threshold_px(&self) -> f64 {
        self.quantizer.threshold_px
    }

    pub fn set_snap_threshold_px(&mut self, threshold_px: f64) {
        self.quantizer.threshold_px = threshold_px.max(0.0);
    }

    pub fn set_snap_to(&mut self, snap_type: SnapType) {
        self.quantizer.snap_type = snap_type;
        info!("snap type changed to {}", snap_type);

        if snap_type.beat_division().is_some() {
            let mut canvas = self.canvas();
            canvas.zoom_changed();
            canvas.redraw_rulers();
        } else if snap_type.is_region_based() {
            self.build_region_boundary_cache();
        }
    }

    /// Select a snap type by index; out-of-range indices select the first type.
    pub fn set_snap_to_index(&mut self, index: usize) {
        let snap_type = SnapType::from_index(index).unwrap_or(SnapType::ALL[0]);
        self.set_snap_to(snap_type);
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.quantizer.snap_mode = mode;
        info!("snap mode changed to {}", mode.label());
    }

    // =========================================================================
    // Quantization
    // =========================================================================

    fn snap_context(&self) -> SnapContext<'_> {
        SnapContext {
            sample_rate: self.session.settings.sample_rate,
            timecode: self.session.settings.timecode(),
            tempo: &self.session,
            marks: &self.session,
            boundaries: &self.boundaries,
        }
    }

    /// Quantize `pos` under the active snap type and mode. A no-op when snap is off.
    pub fn quantize(
        &self,
        pos: Position,
        direction: impl Into<Direction>,
        for_mark: bool,
    ) -> Position {
        self.quantizer.snap(
            &self.snap_context(),
            pos,
            direction.into(),
            for_mark,
            self.viewport.frames_per_pixel,
        )
    }

    /// Quantize with a held snap modifier inverting the mode check.
    pub fn snap_to_with_modifier(
        &self,
        pos: Position,
        modifier_held: bool,
        direction: impl Into<Direction>,
        for_mark: bool,
    ) -> Position {
        self.quantizer.snap_with_modifier(
            &self.snap_context(),
            pos,
            modifier_held,
            direction.into(),
            for_mark,
            self.viewport.frames_per_pixel,
        )
    }

    /// Round without the mode check (the magnetic post-pass still applies).
    pub fn snap_to_internal(
        &self,
        pos: Position,
        direction: impl Into<Direction>,
        for_mark: bool,
    ) -> Position {
        self.quantizer.snap_internal(
            &self.snap_context(),
            pos,
            direction.into(),
            for_mark,
            self.viewport.frames_per_pixel,
        )
    }

    // =========================================================================
    // Region boundary cache
    // =========================================================================

    pub fn region_boundaries(&self) -> &RegionBoundaryCache {
        &self.boundaries
    }

    /// Rebuild the boundary cache for the active region snap type.
    pub fn build_region_boundary_cache(&mut self) {
        let Some(point) = self.quantizer.snap_type.region_point() else {
            return;
        };
        self.boundaries
            .rebuild(&self.session, point, &self.selection.track_ids);
    }

    /// The session's region set changed.
    pub fn region_set_changed(&mut self) {
        if self.quantizer.snap_type.is_region_based() {
            self.build_region_boundary_cache();
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Replace the track selection. This rescopes the region boundaries.
    pub fn set_selected_tracks(&mut self, track_ids: Vec<Uuid>) {
        if self.selection.track_ids == track_ids {
            return;
        }
        self.selection.track_ids = track_ids;
        self.region_set_changed();
    }

    pub fn toggle_track_selection(&mut self, track_id: Uuid) {
        self.selection.toggle_track(track_id);
        self.region_set_changed();
    }

    pub fn clear_selection(&mut self) {
        let had_tracks = !self.selection.track_ids.is_empty();
        self.selection.clear();
        if had_tracks {
            self.region_set_changed();
        }
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn rulers(&self) -> &RulerState {
        &self.rulers
    }

    pub fn leftmost_frame(&self) -> Position {
        self.viewport.leftmost_frame
    }

    pub fn frames_per_pixel(&self) -> f64 {
        self.viewport.frames_per_pixel
    }

    pub fn request_time_origin(&mut self, pos: Position) {
        self.visual.request_time_origin(pos, &mut self.idle);
    }

    pub fn request_zoom(&mut self, frames_per_pixel: f64) {
        self.visual.request_zoom(frames_per_pixel, &mut self.idle);
    }

    pub fn request_vertical_origin(&mut self, y: f64) {
        self.visual.request_vertical_origin(y, &mut self.idle);
    }

    /// Move and zoom in one step.
    pub fn reposition_and_zoom(&mut self, pos: Position, frames_per_pixel: f64) {
        self.request_time_origin(pos);
        self.request_zoom(frames_per_pixel);
    }

    pub fn visual_scheduler(&self) -> &VisualChangeScheduler {
        &self.visual
    }

    /// Handle for queueing viewport changes from other threads.
    pub fn visual_sender(&self) -> VisualChangeSender {
        self.remote_tx.clone()
    }

    /// Route requests queued by other threads through the setters.
    pub fn drain_remote_requests(&mut self) -> usize {
        let requests = self.remote_rx.drain();
        for request in &requests {
            match *request {
                VisualRequest::TimeOrigin(pos) => self.request_time_origin(pos),
                VisualRequest::Zoom(frames_per_pixel) => self.request_zoom(frames_per_pixel),
                VisualRequest::VerticalOrigin(y) => self.request_vertical_origin(y),
            }
        }
        requests.len()
    }

    pub fn connect_visual_changed(&mut self, listener: impl FnMut(&VisualChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Only reached from the queued idle task, so at most one flush is pending.
    fn flush_visual_change(&mut self) -> IdleControl {
        let mut canvas = Canvas {
            viewport: &mut self.viewport,
            rulers: &mut self.rulers,
            session: &self.session,
            limits: self.config.zoom_limits(),
            listeners: &mut self.listeners,
        };
        self.visual.flush(&mut canvas)
    }

    /// One idle pass of the host loop: run every queued idle task.
    ///
    /// Returns the number of tasks that ran. A visual change task with
    /// nothing scheduled is dropped.
    pub fn run_idle(&mut self) -> usize {
        let mut ran = 0;
        let mut requeue = Vec::new();
        while let Some(task) = self.idle.pop() {
            let control = match task {
                IdleTask::VisualChange if !self.visual.is_scheduled() => continue,
                IdleTask::VisualChange => self.flush_visual_change(),
            };
            if control == IdleControl::Continue {
                requeue.push(task);
            }
            ran += 1;
        }
        for task in requeue {
            self.idle.add_idle(task);
        }
        ran
    }

    fn canvas(&mut self) -> Canvas<'_> {
        Canvas {
            viewport: &mut self.viewport,
            rulers: &mut self.rulers,
            session: &self.session,
            limits: self.config.zoom_limits(),
            listeners: &mut self.listeners,
        }
    }
}

/// The parts of the editor a visual change flush writes to.
struct Canvas<'a> {
    viewport: &'a mut Viewport,
    rulers: &'a mut RulerState,
    session: &'a Session,
    limits: ZoomLimits,
    listeners: &'a mut Vec<VisualChangeListener>,
}

impl Canvas<'_> {
    /// Redraw rulers when the pixel offset moved, as a scroll notification would.
    fn scrolled_from(&mut self, before: f64) {
        if self.viewport.horizontal_position() != before {
            let (start, end) = self.viewport.visible_range();
            self.rulers.redraw(start, end);
        }
    }
}

impl VisualChangeTarget for Canvas<'_> {
    fn horizontal_position(&self) -> f64 {
        self.viewport.horizontal_position()
    }

    fn frames_per_pixel(&self) -> f64 {
        self.viewport.frames_per_pixel
    }

    fn leftmost_frame(&self) -> Position {
        self.viewport.leftmost_frame
    }

    fn vertical_position(&self) -> f64 {
        self.viewport.vertical_position
    }

    fn set_leftmost_frame(&mut self, frame: Position) {
        self.viewport.leftmost_frame = frame;
    }

    fn set_frames_per_pixel(&mut self, frames_per_pixel: f64) -> bool {
        let extent = ZoomLimits::session_extent(self.session.length());
        match self
            .limits
            .resolve(frames_per_pixel, self.viewport.frames_per_pixel, extent)
        {
            Some(resolved) => {
                let pixel = self.viewport.horizontal_position();
                self.viewport.set_frames_per_pixel(resolved);
                self.scrolled_from(pixel);
                debug!("zoom set to {} frames/px", resolved);
                true
            }
            None => false,
        }
    }

    fn zoom_changed(&mut self) {
        let (start, end) = self.viewport.visible_range();
        self.rulers
            .recompute_scale(self.viewport.frames_per_pixel, &self.session.settings.timecode());
        let tempo: &dyn TempoMap = self.session;
        self.rulers.recompute_grid(tempo, start, end);
    }

    fn set_horizontal_position(&mut self, pixel: f64) {
        let before = self.viewport.horizontal_position();
        self.viewport.set_horizontal_position(pixel);
        self.scrolled_from(before);
    }

    fn set_vertical_position(&mut self, y: f64) {
        self.viewport.vertical_position = y.max(0.0);
    }

    fn redraw_rulers(&mut self) {
        let (start, end) = self.viewport.visible_range();
        let tempo: &dyn TempoMap = self.session;
        self.rulers.recompute_grid(tempo, start, end);
        self.rulers.redraw(start, end);
    }

    fn visual_changed(&mut self, change: &VisualChange) {
        for listener in self.listeners.iter_mut() {
            listener(change);
        }
    }
}
