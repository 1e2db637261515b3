//! Run & Collapse headless runner
//!
//! Drives the simulation with a simple autopilot at 60 Hz and prints one HUD
//! line per simulated second. Usage: `run-collapse [seed] [tuning.json]`

use run_collapse::consts::FRAME_RATE;
use run_collapse::sim::{Ability, Simulation, TickInput};
use run_collapse::{Hud, Tuning};

/// Frames to simulate (two minutes of play)
const FRAMES: u64 = 120 * 60;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };

    log::info!("Run & Collapse (headless) seed={seed}");
    let mut sim = Simulation::with_tuning(seed, tuning);
    let dt = 1.0 / FRAME_RATE;
    let mut runs = 1u32;

    for frame in 0..FRAMES {
        let input = autopilot(&sim);
        if input.restart {
            runs += 1;
        }
        sim.update(&input, dt);

        if frame % FRAME_RATE as u64 == 0 {
            match serde_json::to_string(&Hud::from_sim(&sim)) {
                Ok(line) => println!("{line}"),
                Err(err) => log::error!("failed to encode HUD: {err}"),
            }
        }
    }

    log::info!("finished {FRAMES} frames over {runs} run(s)");
}

fn load_tuning(path: &str) -> Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("could not read {path}: {err}, using defaults");
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("loaded tuning from {path}");
            tuning
        }
        Err(err) => {
            log::warn!("invalid tuning in {path}: {err}, using defaults");
            Tuning::default()
        }
    }
}

/// Keep up with the scroll, hop gaps, and spend abilities when they come up
fn autopilot(sim: &Simulation) -> TickInput {
    if sim.is_game_over() {
        return TickInput {
            restart: true,
            ..Default::default()
        };
    }

    let player = &sim.player;
    let tuning = &sim.tuning;
    let feet = player.x + player.w * 0.5;

    // Jump when the walkable surface ahead ends or has collapsed
    let ahead = feet + tuning.base_speed * 0.25;
    let solid_ahead = sim
        .terrain
        .segments()
        .iter()
        .any(|s| !s.broken && s.x <= ahead && ahead <= s.trailing_edge());
    let falling_low = player.y >= tuning.max_visible_y() - 1.0;

    TickInput {
        move_left: player.x > tuning.viewport_width * 0.6,
        move_right: player.x < tuning.viewport_width * 0.3,
        jump: player.grounded && !solid_ahead,
        dash: !sim.meter.is_cooling(Ability::Dash) && sim.meter.energy > 60.0,
        trigger_echo: !sim.echo.is_active() && sim.ticks % 240 == 0,
        trigger_rewind: falling_low && !player.grounded,
        restart: false,
    }
}
