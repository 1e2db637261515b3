//! Cosmetic debris thrown off by collapsing terrain

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

/// A short-lived ballistic particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Seconds remaining
    pub life: f64,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f64,
}

/// Unbounded pool of live particles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Throw `count` particles from `(x, y)` with randomized velocity and lifetime
    pub fn spawn_burst(
        &mut self,
        rng: &mut impl RandomSource,
        tuning: &Tuning,
        x: f64,
        y: f64,
        color: u32,
        count: usize,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let vel = DVec2::new(
                rng.range(-tuning.particle_vx_range, tuning.particle_vx_range),
                rng.range(tuning.particle_vy_min, tuning.particle_vy_max),
            );
            let life = rng.range(tuning.particle_life_min, tuning.particle_life_max);
            let size = rng.range(tuning.particle_size_min, tuning.particle_size_max);
            self.particles.push(Particle {
                pos: DVec2::new(x, y),
                vel,
                life,
                color,
                size,
            });
        }
    }

    /// Integrate gravity and motion, then drop expired particles
    pub fn update(&mut self, dt: f64, gravity: f64) {
        for particle in &mut self.particles {
            particle.vel.y += gravity * dt;
            particle.pos += particle.vel * dt;
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
