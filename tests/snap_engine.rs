use timeline_snap::core::snap::{
    round_position, RegionBoundaryCache, SnapContext, SnapMode, SnapType,
};
use timeline_snap::core::tempo::ConstantTempoMap;
use timeline_snap::state::{Location, Region, Session, TimecodeSettings};
use timeline_snap::{Direction, Editor, EditorConfig};

fn session_with_regions(regions: &[(i64, i64)]) -> Session {
    let mut session = Session::default();
    let track = session.tracks[0].id;
    for &(position, length) in regions {
        session.add_region(Region::new(track, position, length));
    }
    session
}

fn editor_with(session: Session, snap_type: SnapType, snap_mode: SnapMode) -> Editor {
    let config = EditorConfig {
        snap_type,
        snap_mode,
        frames_per_pixel: 1.0,
        min_frames_per_pixel: 1.0,
        ..EditorConfig::default()
    };
    Editor::new(session, config)
}

#[test]
fn test_rounding_is_idempotent() {
    let tempo = ConstantTempoMap::default();
    let boundaries = RegionBoundaryCache::from_positions(vec![1_000, 50_000, 200_000]);
    let session = Session::default();
    let ctx = SnapContext {
        sample_rate: 48_000,
        timecode: TimecodeSettings::new(48_000, 30.0),
        tempo: &tempo,
        marks: &session,
        boundaries: &boundaries,
    };

    let types = [
        SnapType::CdFrame,
        SnapType::TimecodeFrame,
        SnapType::TimecodeSeconds,
        SnapType::TimecodeMinutes,
        SnapType::Seconds,
        SnapType::Minutes,
        SnapType::Beat,
        SnapType::Bar,
        SnapType::BeatDiv4,
        SnapType::RegionStart,
        SnapType::RegionEnd,
        SnapType::RegionSync,
        SnapType::RegionBoundary,
    ];
    for snap_type in types {
        for pos in [0, 1, 12_345, 777_777, 5_000_000] {
            for direction in [Direction::Backward, Direction::Nearest, Direction::Forward] {
                let once = round_position(&ctx, snap_type, pos, direction, false);
                let twice = round_position(&ctx, snap_type, once, direction, false);
                assert_eq!(once, twice, "{} {:?} at {}", snap_type, direction, pos);
            }
        }
    }
}

#[test]
fn test_mark_snap_moves_off_a_mark_it_landed_on() {
    // Marks are looked up strictly either side, so a position sitting on a
    // mark ignores that mark and snaps to a neighbour.
    let mut session = Session::default();
    session.add_location(Location::mark(1_000));
    session.add_location(Location::mark(5_000));
    let editor = editor_with(session, SnapType::Mark, SnapMode::Normal);

    let once = editor.quantize(2_000, Direction::Nearest, false);
    assert_eq!(once, 1_000);
    assert_eq!(editor.quantize(once, Direction::Nearest, false), 5_000);
    assert_eq!(editor.quantize(once, Direction::Nearest, true), 1_000);
}

#[test]
fn test_beat_snap_uses_session_sample_rate() {
    let session = Session::from_json(r#"{ "settings": { "sample_rate": 44100 } }"#).unwrap();
    let editor = editor_with(session, SnapType::Beat, SnapMode::Normal);
    // 120 bpm at 44.1 kHz: one beat is 22_050 frames.
    assert_eq!(editor.quantize(22_000, Direction::Nearest, false), 22_050);

    let mut editor = editor;
    editor.set_snap_to(SnapType::Bar);
    assert_eq!(editor.quantize(100_000, Direction::Nearest, false), 88_200);
    editor.set_snap_to(SnapType::BeatDiv2);
    assert_eq!(editor.quantize(12_000, Direction::Nearest, false), 11_025);
}

#[test]
fn test_seconds_snap_near_max_position() {
    let editor = editor_with(Session::default(), SnapType::Seconds, SnapMode::Normal);
    let pos = i64::MAX - 10;
    assert_eq!(editor.quantize(pos, Direction::Forward, false), i64::MAX);
    assert!(editor.quantize(pos, Direction::Backward, false) <= pos);
    assert!(editor.quantize(pos, Direction::Nearest, false) <= pos);
}

#[test]
fn test_rounding_is_monotonic() {
    let tempo = ConstantTempoMap::default();
    let boundaries = RegionBoundaryCache::from_positions(vec![1_000, 50_000, 200_000]);
    let session = Session::default();
    let ctx = SnapContext {
        sample_rate: 48_000,
        timecode: TimecodeSettings::new(48_000, 30.0),
        tempo: &tempo,
        marks: &session,
        boundaries: &boundaries,
    };

    for snap_type in [SnapType::Seconds, SnapType::Beat, SnapType::RegionStart] {
        for direction in [Direction::Backward, Direction::Nearest, Direction::Forward] {
            let mut last = i64::MIN;
            for pos in (0..300_000).step_by(997) {
                let snapped = round_position(&ctx, snap_type, pos, direction, false);
                assert!(snapped >= last, "{} {:?} at {}", snap_type, direction, pos);
                last = snapped;
            }
        }
    }
}

#[test]
fn test_region_start_cache_lookup() {
    let session = session_with_regions(&[(10, 5), (20, 5), (30, 5)]);
    let editor = editor_with(session, SnapType::RegionStart, SnapMode::Normal);
    assert_eq!(editor.region_boundaries().positions(), &[10, 20, 30]);

    assert_eq!(editor.quantize(14, Direction::Nearest, false), 10);
    assert_eq!(editor.quantize(16, Direction::Nearest, false), 20);
    assert_eq!(editor.quantize(15, Direction::Nearest, false), 10);
    // Direction only picks the search bound; the midpoint still decides.
    assert_eq!(editor.quantize(25, Direction::Forward, false), 20);
    assert_eq!(editor.quantize(26, Direction::Forward, false), 30);
    assert_eq!(editor.quantize(25, Direction::Backward, false), 20);
    assert_eq!(editor.quantize(40, Direction::Forward, false), 30);
    assert_eq!(editor.quantize(5, Direction::Backward, false), 10);
}

#[test]
fn test_magnetic_pull_radius() {
    let mut session = Session::default();
    session.add_location(Location::mark(1_000));
    let mut editor = editor_with(session, SnapType::Mark, SnapMode::Magnetic);
    editor.set_snap_threshold_px(5.0);

    assert_eq!(editor.quantize(1_004, Direction::Nearest, false), 1_000);
    assert_eq!(editor.quantize(1_005, Direction::Nearest, false), 1_000);
    assert_eq!(editor.quantize(1_006, Direction::Nearest, false), 1_006);
    assert_eq!(editor.quantize(994, Direction::Nearest, false), 994);
}

#[test]
fn test_region_edit_rebuilds_cache() {
    let session = session_with_regions(&[(10, 5)]);
    let mut editor = editor_with(session, SnapType::RegionStart, SnapMode::Normal);
    assert_eq!(editor.region_boundaries().positions(), &[10]);

    let region = editor.session().regions[0].id;
    editor.edit_session(|session| session.move_region(region, 40));
    assert_eq!(editor.region_boundaries().positions(), &[40]);
    assert_eq!(editor.quantize(12, Direction::Nearest, false), 40);
}

#[test]
fn test_track_selection_scopes_cache() {
    let mut session = session_with_regions(&[(100, 10)]);
    let second = session.add_track();
    session.add_region(Region::new(second, 500, 10));
    let mut editor = editor_with(session, SnapType::RegionStart, SnapMode::Normal);
    assert_eq!(editor.region_boundaries().positions(), &[100, 500]);

    editor.set_selected_tracks(vec![second]);
    assert_eq!(editor.region_boundaries().positions(), &[500]);

    editor.clear_selection();
    assert_eq!(editor.region_boundaries().positions(), &[100, 500]);
}

#[test]
fn test_hidden_tracks_are_skipped() {
    let mut session = session_with_regions(&[(100, 10)]);
    let hidden = session.add_track();
    session.add_region(Region::new(hidden, 500, 10));
    session.set_track_hidden(hidden, true);
    let editor = editor_with(session, SnapType::RegionBoundary, SnapMode::Normal);
    assert_eq!(editor.region_boundaries().positions(), &[100, 109]);
}

#[test]
fn test_modifier_inverts_mode() {
    let editor = editor_with(Session::default(), SnapType::Seconds, SnapMode::Off);
    assert_eq!(editor.quantize(50_000, Direction::Nearest, false), 50_000);
    assert_eq!(editor.snap_to_with_modifier(50_000, true, Direction::Nearest, false), 48_000);
    assert_eq!(editor.snap_to_with_modifier(50_000, false, Direction::Nearest, false), 50_000);

    let mut editor = editor;
    editor.set_snap_mode(SnapMode::Normal);
    assert_eq!(editor.snap_to_with_modifier(50_000, true, Direction::Nearest, false), 50_000);
    assert_eq!(editor.snap_to_with_modifier(50_000, false, Direction::Nearest, false), 48_000);
}

#[test]
fn test_switching_snap_type_keeps_mode() {
    let mut editor = editor_with(Session::default(), SnapType::Seconds, SnapMode::Normal);
    editor.set_snap_to(SnapType::Bar);
    assert_eq!(editor.snap_mode(), SnapMode::Normal);
    // 120 bpm, 4/4 at 48 kHz: one bar is 96_000 frames.
    assert_eq!(editor.quantize(100_000, Direction::Nearest, false), 96_000);
    assert_eq!(editor.quantize(100_000, Direction::Forward, false), 192_000);
}
