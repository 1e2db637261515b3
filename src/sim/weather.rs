//! Weather cycle
//!
//! Wind slows the world scroll; rain makes the player heavier and damps
//! vertical speed. Clear and fog only change how the frame looks.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Wind,
    Fog,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Rain, Weather::Wind, Weather::Fog];

    pub fn label(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Rain => "Rain",
            Weather::Wind => "Wind",
            Weather::Fog => "Fog",
        }
    }
}

/// Physics multipliers for the current mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherModifiers {
    pub scroll_factor: f64,
    pub gravity: f64,
    /// Per-tick multiplier on vertical velocity
    pub friction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherController {
    mode: Weather,
    elapsed: f64,
    duration: f64,
}

impl Default for WeatherController {
    fn default() -> Self {
        Self {
            mode: Weather::Clear,
            elapsed: 0.0,
            duration: 8.0,
        }
    }
}

impl WeatherController {
    /// Start a cycle with a freshly rolled mode
    pub fn new(rng: &mut impl RandomSource, tuning: &Tuning) -> Self {
        let mut controller = Self::default();
        controller.change(rng, tuning);
        controller
    }

    pub fn mode(&self) -> Weather {
        self.mode
    }

    /// Seconds until the next roll
    pub fn remaining(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Pin a mode and restart its timer (scenario setup, debug keys)
    pub fn force(&mut self, mode: Weather, duration: f64) {
        self.mode = mode;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    /// Roll a new mode uniformly and a new duration
    pub fn change(&mut self, rng: &mut impl RandomSource, tuning: &Tuning) {
        self.mode = Weather::ALL[rng.pick(Weather::ALL.len())];
        self.elapsed = 0.0;
        self.duration = rng.range(tuning.weather_duration_min, tuning.weather_duration_max);
        log::info!("weather: {} for {:.1}s", self.mode.label(), self.duration);
    }

    /// Advance the timer. Returns true when the mode was re-rolled.
    pub fn update(&mut self, rng: &mut impl RandomSource, tuning: &Tuning, dt: f64) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.duration {
            self.change(rng, tuning);
            return true;
        }
        false
    }

    pub fn modifiers(&self, tuning: &Tuning) -> WeatherModifiers {
        match self.mode {
            Weather::Wind => WeatherModifiers {
                scroll_factor: tuning.wind_scroll_factor,
                gravity: tuning.gravity,
                friction: 1.0,
            },
            Weather::Rain => WeatherModifiers {
                scroll_factor: 1.0,
                gravity: tuning.rain_gravity,
                friction: tuning.rain_friction,
            },
            Weather::Clear | Weather::Fog => WeatherModifiers {
                scroll_factor: 1.0,
                gravity: tuning.gravity,
                friction: 1.0,
            },
        }
    }
}
