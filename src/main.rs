//! Timeline Snap
//!
//! Quantize positions against a saved session from the command line.
//!
//! ```text
//! timeline-snap <session.json> [--config <file>] [--snap <type>] [--mode <mode>]
//!               [--direction <-1|0|1>] <position>...
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use timeline_snap::state::Session;
use timeline_snap::{
    Direction, Editor, EditorConfig, Position, Result, SnapError, SnapMode, SnapType,
};

struct Args {
    session: PathBuf,
    config: Option<PathBuf>,
    snap_type: Option<SnapType>,
    snap_mode: Option<SnapMode>,
    direction: Direction,
    positions: Vec<Position>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut session: Option<PathBuf> = None;
    let mut config = None;
    let mut snap_type: Option<SnapType> = None;
    let mut snap_mode: Option<SnapMode> = None;
    let mut direction = Direction::Nearest;
    let mut positions = Vec::new();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| SnapError::InvalidArgument(format!("{} needs a value", flag)))
        };
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--snap" => snap_type = Some(value("--snap")?.parse()?),
            "--mode" => snap_mode = Some(value("--mode")?.parse()?),
            "--direction" => {
                let raw = value("--direction")?;
                let sign: i32 = raw.parse().map_err(|_| {
                    SnapError::InvalidArgument(format!("bad direction '{}'", raw))
                })?;
                direction = Direction::from_sign(sign);
            }
            _ if session.is_none() => session = Some(PathBuf::from(&arg)),
            _ => {
                let pos: Position = arg.parse().map_err(|_| {
                    SnapError::InvalidArgument(format!("bad position '{}'", arg))
                })?;
                positions.push(pos);
            }
        }
    }

    let session = session
        .ok_or_else(|| SnapError::InvalidArgument("missing session file".to_string()))?;
    Ok(Args {
        session,
        config,
        snap_type,
        snap_mode,
        direction,
        positions,
    })
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let session = Session::load(&args.session)?;
    info!("loaded session '{}' ({} regions)", session.name, session.regions.len());

    let mut editor = Editor::new(session, config);
    if let Some(snap_type) = args.snap_type {
        editor.set_snap_to(snap_type);
    }
    if let Some(snap_mode) = args.snap_mode {
        editor.set_snap_mode(snap_mode);
    }

    for pos in args.positions {
        let snapped = editor.quantize(pos, args.direction, false);
        println!("{}\t{}", pos, snapped);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("timeline-snap: {}", err);
            ExitCode::FAILURE
        }
    }
}
