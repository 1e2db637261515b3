//! Simulation state
//!
//! Everything that changes during a run is owned by [`Simulation`]. A reset
//! rebuilds all of it in place and cancels anything still queued.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::echo::{EchoPlayer, EchoRecorder};
use super::meter::ResourceMeter;
use super::particles::ParticleSystem;
use super::player::{PlayerBody, Stance};
use super::rng::SimRng;
use super::snapshot::{Snapshot, SnapshotRing};
use super::terrain::TerrainStream;
use super::timers::{DeferredEffect, TimerQueue};
use super::weather::WeatherController;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::view::WorldView;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// The player fell out of the world; waits for a restart
    GameOver,
}

/// Complete runner state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: Tuning,
    pub rng: SimRng,
    /// Seconds of simulated time since the last reset
    pub time: f64,
    pub ticks: u64,
    pub phase: GamePhase,
    pub player: PlayerBody,
    pub terrain: TerrainStream,
    /// World scroll before weather (dash lowers it temporarily)
    pub scroll_speed: f64,
    /// Metres travelled
    pub distance: f64,
    pub meter: ResourceMeter,
    pub weather: WeatherController,
    pub snapshots: SnapshotRing,
    pub recorder: EchoRecorder,
    pub echo: EchoPlayer,
    /// Visual particles (not gameplay-affecting, never rewound)
    pub particles: ParticleSystem,
    pub timers: TimerQueue,
}

impl Simulation {
    /// New run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = SimRng::new(seed);
        let weather = WeatherController::new(&mut rng, &tuning);
        let mut sim = Self {
            rng,
            time: 0.0,
            ticks: 0,
            phase: GamePhase::Running,
            player: PlayerBody::spawn(&tuning),
            terrain: TerrainStream::new(),
            scroll_speed: tuning.base_speed,
            distance: 0.0,
            meter: ResourceMeter::new(tuning.max_energy),
            weather,
            snapshots: SnapshotRing::with_capacity(SNAPSHOT_CAPACITY),
            recorder: EchoRecorder::with_capacity(ECHO_CAPACITY),
            echo: EchoPlayer::default(),
            particles: ParticleSystem::new(),
            timers: TimerQueue::new(),
            tuning,
        };
        sim.terrain
            .generate_initial(&mut sim.rng, &sim.tuning, sim.tuning.initial_segments);
        log::info!("run started (seed {})", seed);
        sim
    }

    /// Start over with fresh terrain, player, history and economy. Pending
    /// deferred effects are dropped.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.time = 0.0;
        self.ticks = 0;
        self.phase = GamePhase::Running;
        self.player = PlayerBody::spawn(&self.tuning);
        self.terrain = TerrainStream::new();
        self.terrain
            .generate_initial(&mut self.rng, &self.tuning, self.tuning.initial_segments);
        self.scroll_speed = self.tuning.base_speed;
        self.distance = 0.0;
        self.meter = ResourceMeter::new(self.tuning.max_energy);
        self.weather = WeatherController::new(&mut self.rng, &self.tuning);
        self.snapshots.clear();
        self.recorder.clear();
        self.echo.clear();
        self.particles.clear();
        log::info!("run restarted (seed {})", self.rng.seed());
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn stance(&self) -> Stance {
        match self.phase {
            GamePhase::GameOver => Stance::Fallen,
            GamePhase::Running => self.player.stance(),
        }
    }

    /// Deep copy of the rewindable world
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player.clone(),
            terrain: self.terrain.segments().to_vec(),
            distance: self.distance,
            scroll_speed: self.scroll_speed,
            slow_remaining: self
                .timers
                .scroll_restore_due()
                .map_or(0.0, |due| (due - self.time).max(0.0)),
            energy: self.meter.energy,
        }
    }

    /// Append the current world to the rewind history
    pub fn capture(&mut self) {
        let snapshot = self.snapshot();
        self.snapshots.push(snapshot);
    }

    /// Overwrite the live world with `snapshot`.
    ///
    /// Queued effects are brought in line with the restored world: the dash
    /// slowdown is re-armed with the time it had left, and ripples whose
    /// origin segment is intact again are dropped.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.player = snapshot.player.clone();
        self.terrain.restore(&snapshot.terrain);
        self.distance = snapshot.distance;
        self.scroll_speed = snapshot.scroll_speed;
        self.meter.set_energy(snapshot.energy);

        let terrain = &self.terrain;
        self.timers.retain(|effect| match effect {
            DeferredEffect::Ripple { segment_id } => {
                terrain.find(*segment_id).is_some_and(|s| s.broken)
            }
            DeferredEffect::RestoreScroll { .. } => false,
        });
        if snapshot.slow_remaining > 0.0 {
            self.timers.schedule(
                self.time + snapshot.slow_remaining,
                DeferredEffect::RestoreScroll {
                    speed: self.tuning.base_speed,
                },
            );
        }
    }

    /// Move the world back up to `steps` ticks in one go. Ungated; the
    /// ability path is [`Simulation::try_rewind`]. Returns false (and
    /// changes nothing) with fewer than two snapshots.
    pub fn rewind(&mut self, steps: usize) -> bool {
        match self.snapshots.rewind(steps) {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn player_pos(&self) -> DVec2 {
        DVec2::new(self.player.x, self.player.y)
    }

    /// Read-only view for a renderer or HUD
    pub fn view(&self) -> WorldView<'_> {
        WorldView::new(self)
    }
}
