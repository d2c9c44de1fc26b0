//! Lava Rush entry point
//!
//! Runs a scripted session against the headless engine and logs how it went.
//!
//! Usage: `lava-rush [seed] [--tuning <file>] [--settings <file>]`

use std::path::PathBuf;
use std::process::ExitCode;

use lava_rush::platform::HeadlessEngine;
use lava_rush::sim::{GameState, JumpDirection, SessionPhase, Slot};
use lava_rush::{Game, Settings, Tuning};

/// Slightly slower than 60 Hz so every display frame carries one virtual frame
const FRAME_SECS: f64 = 0.017;
/// Give up after this many display frames
const MAX_FRAMES: u32 = 60 * 60 * 5;
const VIEWPORT_WIDTH: f32 = 375.0;
/// Jump off a platform once it has sunk this far
const BAIL_DEPTH: f32 = -0.6;

struct Args {
    seed: u64,
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        seed: 42,
        tuning: None,
        settings: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tuning" => args.tuning = iter.next().map(PathBuf::from),
            "--settings" => args.settings = iter.next().map(PathBuf::from),
            other => {
                args.seed = other
                    .parse()
                    .map_err(|_| format!("invalid seed `{}`", other))?;
            }
        }
    }
    Ok(args)
}

/// Pick the next jump for the autopilot, if any
fn autopilot(state: &GameState) -> Option<JumpDirection> {
    if state.phase != SessionPhase::Started || state.jump.is_pending() {
        return None;
    }

    let here = state.character.slot;
    let toward = |slot: Slot| match slot.index().cmp(&here.index()) {
        std::cmp::Ordering::Less => JumpDirection::Left,
        std::cmp::Ordering::Greater => JumpDirection::Right,
        std::cmp::Ordering::Equal => JumpDirection::None,
    };

    // Go for an adjacent tank
    let tank = &state.tank;
    if tank.visible && here.index().abs_diff(tank.slot.index()) == 1 {
        return Some(toward(tank.slot));
    }

    if state.platforms.offset(here) > BAIL_DEPTH {
        return None;
    }
    let best = [JumpDirection::Left, JumpDirection::Right]
        .into_iter()
        .filter_map(|direction| here.neighbor(direction))
        .max_by(|a, b| state.platforms.offset(*a).total_cmp(&state.platforms.offset(*b)))?;
    Some(toward(best))
}

/// Screen x that produces a jump in `direction`
fn tap_x(direction: JumpDirection) -> f32 {
    match direction {
        JumpDirection::Left => VIEWPORT_WIDTH * 0.75,
        _ => VIEWPORT_WIDTH * 0.25,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Lava Rush (headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let settings = args
        .settings
        .as_ref()
        .map(Settings::load)
        .unwrap_or_default();

    let engine = HeadlessEngine::lava_rush_with(&tuning);
    let mut game = match Game::new(engine, args.seed, tuning, settings) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Scene setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut started = false;
    for frame in 0..MAX_FRAMES {
        let state = game.state();
        match state.phase {
            SessionPhase::WillStart if !started => {
                started = true;
                game.on_tap(0.0, VIEWPORT_WIDTH);
            }
            SessionPhase::Ended => break,
            _ => {
                if let Some(direction) = autopilot(state) {
                    game.on_tap(tap_x(direction), VIEWPORT_WIDTH);
                }
            }
        }

        game.poll_contacts();
        game.on_frame(frame as f64 * FRAME_SECS);
    }

    let state = game.state();
    let seconds = state.time_frames as f64 / lava_rush::consts::REFERENCE_FPS;
    match state.phase {
        SessionPhase::Ended => log::info!(
            "Run over after {:.1}s: {:?}",
            seconds,
            state.death_cause
        ),
        phase => log::info!("Stopped after {:.1}s still {:?}", seconds, phase),
    }
    log::debug!("{} engine calls recorded", game.engine().calls().len());

    ExitCode::SUCCESS
}
