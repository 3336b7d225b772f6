//! HyprGlide headless demo
//!
//! Runs scripted rounds against the simulation core at a fixed 60 Hz step
//! and prints the outcome. Useful for eyeballing the difficulty curve and
//! event stream without a renderer attached.

use hyprglide::consts::*;
use hyprglide::highscores::{HighScoreEntry, HighScores};
use hyprglide::settings::Settings;
use hyprglide::sim::{ControlInput, GamePhase, GameState, update};

const DEMO_DT: f32 = 1.0 / 60.0;
const DEMO_MAX_FRAMES: usize = 60 * 120;

/// Outcome of one scripted round
struct RoundReport {
    score: u64,
    survival_secs: f32,
    dodges: u32,
    near_misses: u32,
    frames: usize,
}

/// Drive one round to game over (or the frame cap) with a scripted input
/// source, mirroring what a host frame hook would do.
fn run_round(state: &mut GameState, script: impl Fn(&GameState, usize) -> ControlInput) -> RoundReport {
    let mut frames = 0;

    while state.phase != GamePhase::GameOver && frames < DEMO_MAX_FRAMES {
        state.apply_input(script(state, frames));
        let events = update(state, DEMO_DT);

        if let Some(pos) = events.collision {
            log::info!("impact at ({:.0}, {:.0})", pos.x, pos.y);
        }
        for pos in &events.near_misses {
            log::debug!("near miss at x={:.0}", pos.x);
        }
        for (kind, _) in &events.power_ups_collected {
            log::info!("collected {kind:?}");
        }
        if let Some(tier) = events.throttle_changed {
            log::info!("throttle tier now {tier:?}");
        }

        frames += 1;
    }

    RoundReport {
        score: state.score,
        survival_secs: state.difficulty.elapsed,
        dodges: state.dodge_count,
        near_misses: state.near_miss_count,
        frames,
    }
}

/// Drag script: chase the horizontal gap between on-screen obstacles,
/// sliding toward whichever band edge is clearer.
fn drag_script(state: &GameState, _frame: usize) -> ControlInput {
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.pos.y > PLAYER_Y)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let target_x = match (threat, state.bounds) {
        (Some(o), Some(b)) => {
            if o.pos.x > (b.min_x + b.max_x) / 2.0 {
                b.min_x
            } else {
                b.max_x
            }
        }
        _ => state.player.x,
    };
    ControlInput::Drag { target_x }
}

/// Tilt script: weave side to side on a slow sine
fn tilt_script(_state: &GameState, frame: usize) -> ControlInput {
    let t = frame as f32 * DEMO_DT;
    ControlInput::Tilt {
        axis: (t * 0.8).sin() * 0.6,
    }
}

fn main() {
    env_logger::init();

    let settings = Settings::default();
    let mut scores = HighScores::new();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xDECAF);

    log::info!("HyprGlide demo, seed {seed}");

    let mut state = GameState::new(seed);
    state.set_spawn_ramp(settings.ramp.spawn_ramp_secs());
    state.set_tilt_sensitivity(settings.effective_tilt_sensitivity());

    for (name, script) in [
        ("drag", drag_script as fn(&GameState, usize) -> ControlInput),
        ("tilt", tilt_script),
    ] {
        let report = run_round(&mut state, script);
        println!(
            "{name:>5}: score {:>6}  survived {:>5.1}s  dodges {:>3}  near misses {:>3}  ({} frames)",
            report.score, report.survival_secs, report.dodges, report.near_misses, report.frames
        );

        if let Some(rank) = scores.add_run(HighScoreEntry {
            score: report.score,
            survival_secs: report.survival_secs,
            dodges: report.dodges,
            near_misses: report.near_misses,
            timestamp: 0.0,
        }) {
            println!("       new high score, rank #{rank}");
        }

        state.reset();
    }

    if let Some(top) = scores.top_score() {
        println!("  best: {top}");
    }
}
