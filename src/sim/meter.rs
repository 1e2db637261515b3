//! Energy and ability cooldowns

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Which ability a gate or cooldown belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Dash,
    Echo,
    Rewind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeter {
    pub energy: f64,
    pub max_energy: f64,
    pub dash_cooldown: f64,
    pub echo_cooldown: f64,
    pub rewind_cooldown: f64,
}

impl ResourceMeter {
    pub fn new(max_energy: f64) -> Self {
        Self {
            energy: max_energy,
            max_energy,
            dash_cooldown: 0.0,
            echo_cooldown: 0.0,
            rewind_cooldown: 0.0,
        }
    }

    pub fn cooldown(&self, ability: Ability) -> f64 {
        match ability {
            Ability::Dash => self.dash_cooldown,
            Ability::Echo => self.echo_cooldown,
            Ability::Rewind => self.rewind_cooldown,
        }
    }

    pub fn is_cooling(&self, ability: Ability) -> bool {
        self.cooldown(ability) > 0.0
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        self.energy >= cost
    }

    /// Overwrite energy (rewind restore), kept inside `[0, max]`
    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy.clamp(0.0, self.max_energy);
    }

    /// Deduct `cost`, flooring at zero
    pub fn spend(&mut self, cost: f64) {
        self.set_energy(self.energy - cost);
    }

    pub fn start_cooldown(&mut self, ability: Ability, tuning: &Tuning) {
        match ability {
            Ability::Dash => self.dash_cooldown = tuning.dash_cooldown,
            Ability::Echo => self.echo_cooldown = tuning.echo_cooldown,
            Ability::Rewind => self.rewind_cooldown = tuning.rewind_cooldown,
        }
    }

    /// Passive regeneration plus cooldown decay
    pub fn tick(&mut self, regen: f64, dt: f64) {
        self.set_energy(self.energy + regen * dt);
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.echo_cooldown = (self.echo_cooldown - dt).max(0.0);
        self.rewind_cooldown = (self.rewind_cooldown - dt).max(0.0);
    }
}
