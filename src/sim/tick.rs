//! Per-frame simulation step
//!
//! One `tick` per rendered frame with a clamped `dt`; no sub-stepping.

use super::player::PlayerBody;
use super::rng::RandomSource;
use super::state::{GamePhase, Simulation};
use super::timers::DeferredEffect;
use crate::consts::MAX_FRAME_DT;
use crate::tuning::{BREAK_COLOR, RIPPLE_COLOR};

/// Intents for a single tick, already mapped from the input layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub dash: bool,
    pub trigger_echo: bool,
    pub trigger_rewind: bool,
    pub restart: bool,
}

impl TickInput {
    /// -1, 0 or 1; opposite keys cancel out
    pub fn horizontal(&self) -> i8 {
        i8::from(self.move_right) - i8::from(self.move_left)
    }
}

/// Clamp a frame time into `[0, MAX_FRAME_DT]`
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Advance the run by one frame
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f64) {
    if input.restart {
        sim.reset();
        return;
    }
    if sim.phase == GamePhase::GameOver {
        return;
    }

    let dt = sanitize_dt(dt);
    sim.time += dt;
    sim.ticks += 1;

    fire_deferred(sim);

    // Weather and effective scroll
    sim.weather.update(&mut sim.rng, &sim.tuning, dt);
    let modifiers = sim.weather.modifiers(&sim.tuning);
    let effective_scroll = sim.scroll_speed * modifiers.scroll_factor;
    sim.distance += effective_scroll * dt / 100.0;

    // Intents
    sim.player.walk(input.horizontal(), sim.tuning.player_speed, dt);
    if input.jump {
        sim.player.jump(sim.tuning.jump_impulse);
    }
    if input.dash {
        sim.try_dash();
    }
    if input.trigger_echo {
        sim.try_echo();
    }
    if input.trigger_rewind {
        sim.try_rewind();
    }

    // Player physics
    sim.player.integrate(modifiers.gravity, modifiers.friction, dt);
    sim.player.resolve_ground(sim.terrain.segments(), &sim.tuning);
    let raw_y = sim.player.clamp_to_view(&sim.tuning);

    // Terrain
    sim.terrain.scroll(&sim.tuning, effective_scroll, dt);
    sim.terrain.recycle(&mut sim.rng, &sim.tuning);
    for collapse in sim.terrain.evaluate_destruction(&sim.tuning, sim.player.x) {
        sim.particles.spawn_burst(
            &mut sim.rng,
            &sim.tuning,
            collapse.x,
            collapse.y,
            BREAK_COLOR,
            sim.tuning.break_burst,
        );
        let delay = sim
            .rng
            .range(sim.tuning.ripple_delay_min, sim.tuning.ripple_delay_max);
        sim.timers.schedule(
            sim.time + delay,
            DeferredEffect::Ripple {
                segment_id: collapse.id,
            },
        );
        log::debug!("segment {} collapsed", collapse.id);
    }

    sim.particles.update(dt, sim.tuning.particle_gravity);

    // Echo
    let pos = sim.player_pos();
    sim.recorder.record(pos, sim.time);
    sim.echo.update();

    sim.capture();
    sim.meter.tick(sim.tuning.energy_regen, dt);

    if PlayerBody::has_fallen(raw_y, &sim.tuning) {
        sim.phase = GamePhase::GameOver;
        log::info!(
            "game over after {:.0} m ({} ticks)",
            sim.distance,
            sim.ticks
        );
    }
}

/// Run every deferred effect whose time has come
fn fire_deferred(sim: &mut Simulation) {
    for effect in sim.timers.drain_due(sim.time) {
        match effect {
            DeferredEffect::Ripple { segment_id } => {
                let chance = sim.tuning.ripple_chance;
                match sim.terrain.ripple(&mut sim.rng, segment_id, chance) {
                    Some(hit) => {
                        sim.particles.spawn_burst(
                            &mut sim.rng,
                            &sim.tuning,
                            hit.x,
                            hit.y,
                            RIPPLE_COLOR,
                            sim.tuning.ripple_burst,
                        );
                        log::debug!("ripple from {} broke {}", segment_id, hit.id);
                    }
                    None => log::debug!("ripple from {} fizzled", segment_id),
                }
            }
            DeferredEffect::RestoreScroll { speed } => {
                sim.scroll_speed = speed;
            }
        }
    }
}

impl Simulation {
    /// Advance one frame
    pub fn update(&mut self, input: &TickInput, dt: f64) {
        tick(self, input, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::TerrainStream;
    use crate::sim::timers::DeferredEffect;
    use crate::sim::weather::Weather;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Flat, still scenario world with clear weather
    fn scenario(tuning: Tuning) -> Simulation {
        let mut sim = Simulation::with_tuning(7, tuning);
        sim.weather.force(Weather::Clear, 1.0e9);
        sim.terrain = TerrainStream::new();
        sim
    }

    #[test]
    fn test_dt_is_clamped() {
        assert_eq!(sanitize_dt(0.1), MAX_FRAME_DT);
        assert_eq!(sanitize_dt(-1.0), 0.0);
        assert_eq!(sanitize_dt(f64::NAN), 0.0);
        assert_eq!(sanitize_dt(0.016), 0.016);
    }

    #[test]
    fn test_horizontal_intent() {
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(both.horizontal(), 0);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        assert_eq!(left.horizontal(), -1);
    }

    #[test]
    fn test_landing_scenario() {
        let tuning = Tuning {
            oscillation_amplitude: 0.0,
            ..Default::default()
        };
        let mut sim = scenario(tuning);
        sim.terrain.push(-400.0, 500.0, 2000.0);
        sim.player.y = 300.0;
        sim.player.vy = -520.0;
        sim.player.grounded = false;

        let input = TickInput::default();
        let mut landed = false;
        for _ in 0..60 {
            let before = sim.player.y;
            sim.update(&input, 0.1);
            if sim.player.grounded {
                assert!(before < 500.0 - sim.player.h);
                assert_eq!(sim.player.y, 500.0 - sim.player.h);
                assert_eq!(sim.player.vy, 0.0);
                landed = true;
                break;
            }
        }
        assert!(landed, "player never landed");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut sim = Simulation::new(31);
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        sim.update(&input, 1.0 / 60.0);
        let captured = sim.snapshots.latest().cloned().expect("captured");
        sim.update(&input, 1.0 / 60.0);
        assert_ne!(sim.player, captured.player);

        assert!(sim.rewind(1));
        assert_eq!(sim.player, captured.player);
        assert_eq!(sim.terrain.segments(), &captured.terrain[..]);
        assert_eq!(sim.distance, captured.distance);
    }

    #[test]
    fn test_rewind_leaves_particles_running() {
        let mut sim = Simulation::new(4);
        let input = TickInput::default();
        for _ in 0..10 {
            sim.update(&input, 1.0 / 60.0);
        }
        let pos = sim.player_pos();
        sim.particles
            .spawn_burst(&mut sim.rng, &sim.tuning, pos.x, pos.y, 0xffffff, 5);
        let particles = sim.particles.particles().to_vec();
        assert!(sim.rewind(5));
        assert_eq!(sim.particles.particles(), &particles[..]);
    }

    #[test]
    fn test_ripple_breaks_at_most_one_neighbour() {
        let tuning = Tuning {
            ripple_chance: 1.0,
            ..Default::default()
        };
        let mut sim = scenario(tuning);
        sim.terrain.push(-500.0, 500.0, 300.0);
        sim.terrain.push(-200.0, 500.0, 400.0);
        sim.terrain.push(200.0, 500.0, 400.0);
        sim.terrain.push(600.0, 500.0, 400.0);

        let input = TickInput::default();
        for _ in 0..20 {
            sim.update(&input, 0.05);
        }
        let broken: Vec<bool> = sim.terrain.segments().iter().map(|s| s.broken).collect();
        assert_eq!(broken, vec![true, true, false, false]);
        assert!(sim.timers.is_empty());
    }

    #[test]
    fn test_dash_slowdown_restores() {
        let mut sim = Simulation::new(10);
        sim.weather.force(Weather::Clear, 1.0e9);
        sim.time = 2.0;
        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        sim.update(&dash, 0.05);
        assert!(sim.scroll_speed < sim.tuning.base_speed);

        let idle = TickInput::default();
        for _ in 0..20 {
            sim.update(&idle, 0.05);
        }
        assert_eq!(sim.scroll_speed, sim.tuning.base_speed);
    }

    #[test]
    fn test_rewind_into_dash_slowdown_rearms_restore() {
        let tuning = Tuning {
            ripple_chance: 0.0,
            ..Default::default()
        };
        let mut sim = Simulation::with_tuning(10, tuning);
        sim.weather.force(Weather::Clear, 1.0e9);
        sim.time = 2.0;
        let dt = 1.0 / 60.0;
        let base = sim.tuning.base_speed;

        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        sim.update(&dash, dt);
        assert!(sim.scroll_speed < base);

        // Let the slowdown run out, then a few more frames
        let idle = TickInput::default();
        let mut frames = 0;
        while sim.scroll_speed < base {
            sim.update(&idle, dt);
            frames += 1;
            assert!(frames < 120, "slowdown never ended");
        }
        assert_eq!(sim.timers.scroll_restore_due(), None);
        for _ in 0..3 {
            sim.update(&idle, dt);
        }

        // Land back inside the slow window
        assert!(sim.try_rewind());
        assert!(sim.scroll_speed < base);
        let due = sim.timers.scroll_restore_due().expect("restore re-armed");
        assert!(due > sim.time && due <= sim.time + sim.tuning.dash_slow_duration);

        for _ in 0..60 {
            sim.update(&idle, dt);
        }
        assert_eq!(sim.scroll_speed, base);
        assert_eq!(sim.timers.scroll_restore_due(), None);
    }

    #[test]
    fn test_rewind_drops_ripples_from_restored_segments() {
        let mut sim = scenario(Tuning::default());
        let a = sim.terrain.push(0.0, 500.0, 300.0);
        let b = sim.terrain.push(300.0, 500.0, 300.0);
        sim.terrain.push(600.0, 500.0, 300.0);

        // Older state: only `b` broken. Newer state: `a` broken too.
        let mut older = sim.snapshot();
        older.terrain[1].broken = true;
        sim.restore(&older);
        sim.capture();
        let mut newer = older.clone();
        newer.terrain[0].broken = true;
        sim.restore(&newer);
        sim.capture();
        sim.timers
            .schedule(sim.time + 0.5, DeferredEffect::Ripple { segment_id: a });
        sim.timers
            .schedule(sim.time + 0.5, DeferredEffect::Ripple { segment_id: b });

        assert!(sim.rewind(1));
        assert!(!sim.terrain.segments()[0].broken);
        assert_eq!(
            sim.timers.drain_due(sim.time + 1.0),
            vec![DeferredEffect::Ripple { segment_id: b }]
        );
    }

    #[test]
    fn test_restart_cancels_deferred_effects() {
        let mut sim = Simulation::new(10);
        sim.time = 2.0;
        assert!(sim.try_dash());
        assert!(!sim.timers.is_empty());

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        sim.update(&restart, 0.05);
        assert!(sim.timers.is_empty());
        assert_eq!(sim.scroll_speed, sim.tuning.base_speed);
        assert_eq!(sim.player.x, sim.tuning.player_spawn_x);
    }

    #[test]
    fn test_fall_ends_run() {
        let mut sim = scenario(Tuning::default());
        let input = TickInput::default();
        for _ in 0..400 {
            sim.update(&input, 0.05);
            if sim.is_game_over() {
                break;
            }
        }
        assert!(sim.is_game_over());
        assert_eq!(sim.stance(), crate::sim::Stance::Fallen);

        // Frozen until restarted
        let ticks = sim.ticks;
        sim.update(&input, 0.05);
        assert_eq!(sim.ticks, ticks);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        sim.update(&restart, 0.05);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn test_echo_replays_recorded_path() {
        let mut sim = Simulation::new(21);
        let run = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            sim.update(&run, 1.0 / 60.0);
        }
        let first = sim.recorder.copy_path()[0].pos;
        let trigger = TickInput {
            trigger_echo: true,
            ..run.clone()
        };
        sim.update(&trigger, 1.0 / 60.0);
        assert!(sim.echo.is_active());
        assert_eq!(sim.echo.pose(), Some(first));

        // A second trigger while the ghost is out does nothing
        let cooldown = sim.meter.echo_cooldown;
        sim.update(&trigger, 1.0 / 60.0);
        assert!(sim.meter.echo_cooldown < cooldown);
        assert_eq!(sim.echo.active().map(|e| e.path.len()), Some(10));
    }

    #[test]
    fn test_distance_accumulates_with_wind() {
        let mut sim = scenario(Tuning::default());
        sim.weather.force(Weather::Wind, 1.0e9);
        sim.update(&TickInput::default(), 0.05);
        assert!((sim.distance - 220.0 * 0.85 * 0.05 / 100.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_energy_stays_bounded(
            seed in any::<u64>(),
            inputs in prop::collection::vec(any::<[bool; 6]>(), 1..300),
        ) {
            let mut sim = Simulation::new(seed);
            for keys in inputs {
                let input = TickInput {
                    move_left: keys[0],
                    move_right: keys[1],
                    jump: keys[2],
                    dash: keys[3],
                    trigger_echo: keys[4],
                    trigger_rewind: keys[5],
                    restart: false,
                };
                sim.update(&input, 1.0 / 30.0);
                prop_assert!(sim.meter.energy >= 0.0);
                prop_assert!(sim.meter.energy <= sim.meter.max_energy);
            }
        }
    }
}
