use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use timeline_snap::state::Session;
use timeline_snap::timeline::{VisualChange, VisualChangeFlags};
use timeline_snap::{Editor, EditorConfig};

fn editor() -> Editor {
    Editor::new(Session::default(), EditorConfig::default())
}

fn record_changes(editor: &mut Editor) -> Rc<RefCell<Vec<VisualChange>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    editor.connect_visual_changed(move |change| sink.borrow_mut().push(change.clone()));
    changes
}

#[test]
fn test_requests_coalesce_into_one_flush() {
    let mut editor = editor();
    let changes = record_changes(&mut editor);

    editor.request_time_origin(100);
    editor.request_zoom(4.0);
    editor.request_time_origin(200);
    assert!(editor.visual_scheduler().is_scheduled());

    assert_eq!(editor.run_idle(), 1);
    assert!(!editor.visual_scheduler().is_scheduled());
    assert_eq!(editor.visual_scheduler().flush_count(), 1);
    assert_eq!(editor.leftmost_frame(), 200);
    assert_eq!(editor.frames_per_pixel(), 4.0);

    let changes = changes.borrow();
    assert_eq!(changes.len(), 1);
    assert!(changes[0].applied.contains(VisualChangeFlags::TIME_ORIGIN));
    assert!(changes[0].applied.contains(VisualChangeFlags::ZOOM_LEVEL));
    assert!(changes[0].zoom_applied);
}

#[test]
fn test_idle_queue_is_empty_after_flush() {
    let mut editor = editor();
    let changes = record_changes(&mut editor);

    editor.request_vertical_origin(30.0);
    assert_eq!(editor.run_idle(), 1);
    assert_eq!(editor.run_idle(), 0);
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn test_each_idle_pass_flushes_once() {
    let mut editor = editor();
    let changes = record_changes(&mut editor);

    editor.request_zoom(4.0);
    assert_eq!(editor.run_idle(), 1);
    editor.request_zoom(8.0);
    assert!(editor.visual_scheduler().is_scheduled());
    assert_eq!(editor.run_idle(), 1);
    assert_eq!(editor.run_idle(), 0);

    assert_eq!(editor.visual_scheduler().flush_count(), 2);
    assert_eq!(changes.borrow().len(), 2);
    assert_eq!(editor.frames_per_pixel(), 8.0);
}

#[test]
fn test_zoom_keeps_scroll_offset_consistent() {
    let mut editor = editor();
    let changes = record_changes(&mut editor);

    editor.request_time_origin(51_200);
    editor.run_idle();
    editor.request_zoom(1_024.0);
    editor.run_idle();
    let viewport = editor.viewport();
    assert_eq!(viewport.leftmost_frame, 51_200);
    assert_eq!(
        viewport.horizontal_position() * viewport.frames_per_pixel,
        viewport.leftmost_frame as f64
    );

    // Scrolling after the zoom is a real scroll, not a forced redraw.
    editor.request_time_origin(102_400);
    editor.run_idle();
    let changes = changes.borrow();
    assert!(!changes[1].forced_redraw);
    assert!(!changes[2].forced_redraw);
    assert_eq!(changes[2].leftmost_frame, 102_400);
}

#[test]
fn test_zoom_floor_and_session_width() {
    let mut editor = editor();
    let changes = record_changes(&mut editor);

    // Below the frames-per-pixel floor: clamped.
    editor.request_zoom(0.25);
    editor.run_idle();
    assert_eq!(editor.frames_per_pixel(), 2.0);

    // 600 s at 48 kHz over 100_000 frames/px is 288 px, narrower than 800 px.
    editor.request_zoom(100_000.0);
    editor.run_idle();
    assert_eq!(editor.frames_per_pixel(), 2.0);

    let changes = changes.borrow();
    assert_eq!(changes.len(), 2);
    assert!(changes[0].zoom_applied);
    assert!(!changes[1].zoom_applied);
}

#[test]
fn test_empty_session_zoom_is_unbounded() {
    let mut session = Session::default();
    session.settings.length = 0;
    let mut editor = Editor::new(session, EditorConfig::default());

    editor.request_zoom(1_000_000.0);
    editor.run_idle();
    assert_eq!(editor.frames_per_pixel(), 1_000_000.0);
}

#[test]
fn test_remote_requests_coalesce() {
    let mut editor = editor();
    let sender = editor.visual_sender();

    let worker = thread::spawn(move || {
        sender.time_origin(100);
        sender.zoom(8.0);
        sender.time_origin(300);
    });
    worker.join().unwrap();

    assert_eq!(editor.drain_remote_requests(), 3);
    assert_eq!(editor.run_idle(), 1);
    assert_eq!(editor.leftmost_frame(), 300);
    assert_eq!(editor.frames_per_pixel(), 8.0);
    assert_eq!(editor.drain_remote_requests(), 0);
}

#[test]
fn test_forced_redraw_when_not_scrolled() {
    let mut editor = editor();
    let changes = record_changes(&mut editor);
    let redraws = editor.rulers().redraw_count();

    editor.request_vertical_origin(40.0);
    editor.run_idle();
    assert_eq!(editor.viewport().vertical_position, 40.0);
    assert_eq!(editor.rulers().redraw_count(), redraws + 1);

    editor.request_time_origin(512 * 100);
    editor.run_idle();
    assert_eq!(editor.rulers().redraw_count(), redraws + 2);

    let changes = changes.borrow();
    assert!(changes[0].forced_redraw);
    assert!(!changes[1].forced_redraw);
    assert_eq!(changes[1].leftmost_frame, 51_200);
}

#[test]
fn test_reposition_and_zoom() {
    let mut editor = editor();
    editor.reposition_and_zoom(96_000, 16.0);
    editor.run_idle();
    assert_eq!(editor.leftmost_frame(), 96_000);
    assert_eq!(editor.frames_per_pixel(), 16.0);
    assert_eq!(editor.viewport().horizontal_position(), 6_000.0);
}

#[test]
fn test_zoom_recomputes_ruler_scale() {
    let mut editor = editor();
    let before = editor.rulers().scale.major_tick_frames;
    editor.request_zoom(48_000.0 / 10.0);
    editor.run_idle();
    assert!(editor.rulers().scale.major_tick_frames > before);
}
