//! Read-only output for renderers and the HUD

use glam::DVec2;
use serde::Serialize;

use crate::sim::meter::Ability;
use crate::sim::particles::Particle;
use crate::sim::player::PlayerBody;
use crate::sim::state::Simulation;
use crate::sim::terrain::Segment;
use crate::sim::weather::Weather;

/// Borrowed view of one frame
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub player: &'a PlayerBody,
    pub segments: &'a [Segment],
    pub particles: &'a [Particle],
    pub echo_pose: Option<DVec2>,
    pub weather: Weather,
    pub hud: Hud,
}

impl<'a> WorldView<'a> {
    pub fn new(sim: &'a Simulation) -> Self {
        Self {
            player: &sim.player,
            segments: sim.terrain.segments(),
            particles: sim.particles.particles(),
            echo_pose: sim.echo.pose(),
            weather: sim.weather.mode(),
            hud: Hud::from_sim(sim),
        }
    }
}

/// HUD numbers, rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub energy: i32,
    pub weather: &'static str,
    pub distance_m: i64,
    pub game_over: bool,
    pub dash_ready: bool,
    pub echo_ready: bool,
    pub rewind_ready: bool,
}

impl Hud {
    pub fn from_sim(sim: &Simulation) -> Self {
        let meter = &sim.meter;
        let tuning = &sim.tuning;
        Self {
            energy: meter.energy.round() as i32,
            weather: sim.weather.mode().label(),
            distance_m: sim.distance.round() as i64,
            game_over: sim.is_game_over(),
            dash_ready: !meter.is_cooling(Ability::Dash) && meter.can_afford(tuning.dash_cost),
            echo_ready: !meter.is_cooling(Ability::Echo) && !sim.echo.is_active(),
            rewind_ready: !meter.is_cooling(Ability::Rewind)
                && meter.can_afford(tuning.rewind_cost)
                && sim.snapshots.len() > tuning.rewind_min_depth,
        }
    }
}
