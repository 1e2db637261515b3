//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-tuned from a JSON
//! document without touching the simulation code.

use serde::{Deserialize, Serialize};

/// Particle colours (0xRRGGBB)
pub const BREAK_COLOR: u32 = 0xffb86b;
pub const RIPPLE_COLOR: u32 = 0xff9b9b;

/// Complete set of tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub viewport_width: f64,
    pub viewport_height: f64,

    // === World scroll ===
    /// Base scroll speed (px/s)
    pub base_speed: f64,

    // === Player ===
    pub player_width: f64,
    pub player_height: f64,
    pub player_spawn_x: f64,
    /// Horizontal displacement per second while a move intent is held
    pub player_speed: f64,
    pub gravity: f64,
    pub jump_impulse: f64,
    /// Extra horizontal reach when testing support
    pub support_tolerance: f64,
    /// Depth below the surface still counted as standing on it
    pub support_band: f64,
    /// Most negative `vy` that can still snap to a surface
    pub max_snap_rise: f64,
    /// Visible vertical range for the player's `y`
    pub min_visible_y: f64,
    pub bottom_margin: f64,
    /// How far below the viewport the player must fall to end the run
    pub fall_margin: f64,

    // === Terrain ===
    pub initial_segments: usize,
    pub initial_start_x: f64,
    pub initial_width_min: f64,
    pub initial_width_max: f64,
    pub recycled_width_min: f64,
    pub recycled_width_max: f64,
    /// Baseline sits at `viewport_height * baseline_ratio`
    pub baseline_ratio: f64,
    pub baseline_wave_amplitude: f64,
    pub baseline_wave_frequency: f64,
    pub initial_noise: f64,
    pub recycled_noise: f64,
    pub oscillation_frequency: f64,
    pub oscillation_amplitude: f64,
    pub fade_rate: f64,
    /// Trailing-edge x beyond which the head segment is recycled
    pub recycle_threshold: f64,
    /// Distance behind the player at which a segment collapses
    pub destruction_margin: f64,
    pub ripple_delay_min: f64,
    pub ripple_delay_max: f64,
    pub ripple_chance: f64,
    pub break_burst: usize,
    pub ripple_burst: usize,

    // === Particles ===
    pub particle_gravity: f64,
    pub particle_vx_range: f64,
    pub particle_vy_min: f64,
    pub particle_vy_max: f64,
    pub particle_life_min: f64,
    pub particle_life_max: f64,
    pub particle_size_min: f64,
    pub particle_size_max: f64,

    // === Weather ===
    pub weather_duration_min: f64,
    pub weather_duration_max: f64,
    pub wind_scroll_factor: f64,
    pub rain_gravity: f64,
    pub rain_friction: f64,

    // === Energy & abilities ===
    pub max_energy: f64,
    pub energy_regen: f64,
    pub dash_cost: f64,
    pub dash_cooldown: f64,
    pub dash_min_interval: f64,
    pub dash_impulse: f64,
    pub dash_slow_factor: f64,
    pub dash_slow_duration: f64,
    pub rewind_cost: f64,
    pub rewind_cooldown: f64,
    /// Snapshot depth that must be exceeded before rewinding
    pub rewind_min_depth: usize,
    pub rewind_steps: usize,
    pub echo_cooldown: f64,
    pub echo_min_path: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,

            base_speed: 220.0,

            player_width: 36.0,
            player_height: 48.0,
            player_spawn_x: 200.0,
            player_speed: 180.0,
            gravity: 1600.0,
            jump_impulse: -520.0,
            support_tolerance: 20.0,
            support_band: 40.0,
            max_snap_rise: -200.0,
            min_visible_y: 20.0,
            bottom_margin: 10.0,
            fall_margin: 80.0,

            initial_segments: 40,
            initial_start_x: -200.0,
            initial_width_min: 180.0,
            initial_width_max: 420.0,
            recycled_width_min: 160.0,
            recycled_width_max: 420.0,
            baseline_ratio: 0.6,
            baseline_wave_amplitude: 80.0,
            baseline_wave_frequency: 0.6,
            initial_noise: 40.0,
            recycled_noise: 80.0,
            oscillation_frequency: 0.002,
            oscillation_amplitude: 0.4,
            fade_rate: 0.6,
            recycle_threshold: -500.0,
            destruction_margin: 380.0,
            ripple_delay_min: 0.18,
            ripple_delay_max: 0.7,
            ripple_chance: 0.55,
            break_burst: 18,
            ripple_burst: 14,

            particle_gravity: 1500.0,
            particle_vx_range: 120.0,
            particle_vy_min: -220.0,
            particle_vy_max: -20.0,
            particle_life_min: 0.5,
            particle_life_max: 1.6,
            particle_size_min: 2.0,
            particle_size_max: 6.0,

            weather_duration_min: 6.0,
            weather_duration_max: 16.0,
            wind_scroll_factor: 0.85,
            rain_gravity: 1750.0,
            rain_friction: 0.92,

            max_energy: 100.0,
            energy_regen: 8.0,
            dash_cost: 18.0,
            dash_cooldown: 1.0,
            dash_min_interval: 0.9,
            dash_impulse: 120.0,
            dash_slow_factor: 0.6,
            dash_slow_duration: 0.7,
            rewind_cost: 22.0,
            rewind_cooldown: 4.0,
            rewind_min_depth: 5,
            rewind_steps: 14,
            echo_cooldown: 6.0,
            echo_min_path: 5,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Floor of the visible vertical range for the player's `y`
    pub fn max_visible_y(&self) -> f64 {
        self.viewport_height - self.player_height - self.bottom_margin
    }

    /// Resting baseline of freshly generated terrain
    pub fn baseline(&self) -> f64 {
        self.viewport_height * self.baseline_ratio
    }

    /// Fix up values that would make the simulation misbehave
    pub fn sanitized(mut self) -> Self {
        fn order(name: &str, min: &mut f64, max: &mut f64) {
            if *min > *max {
                log::warn!("tuning: {name} range inverted ({min} > {max}), swapping");
                std::mem::swap(min, max);
            }
        }

        fn non_negative(name: &str, value: &mut f64) {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("tuning: {name} = {value} is invalid, using 0");
                *value = 0.0;
            }
        }

        order(
            "initial width",
            &mut self.initial_width_min,
            &mut self.initial_width_max,
        );
        order(
            "recycled width",
            &mut self.recycled_width_min,
            &mut self.recycled_width_max,
        );
        order(
            "ripple delay",
            &mut self.ripple_delay_min,
            &mut self.ripple_delay_max,
        );
        order(
            "particle vy",
            &mut self.particle_vy_min,
            &mut self.particle_vy_max,
        );
        order(
            "particle life",
            &mut self.particle_life_min,
            &mut self.particle_life_max,
        );
        order(
            "particle size",
            &mut self.particle_size_min,
            &mut self.particle_size_max,
        );
        order(
            "weather duration",
            &mut self.weather_duration_min,
            &mut self.weather_duration_max,
        );

        non_negative("initial_width_min", &mut self.initial_width_min);
        non_negative("recycled_width_min", &mut self.recycled_width_min);
        non_negative("ripple_delay_min", &mut self.ripple_delay_min);
        non_negative("max_energy", &mut self.max_energy);
        non_negative("energy_regen", &mut self.energy_regen);
        non_negative("dash_cost", &mut self.dash_cost);
        non_negative("rewind_cost", &mut self.rewind_cost);
        non_negative("particle_vx_range", &mut self.particle_vx_range);

        if !(0.0..=1.0).contains(&self.ripple_chance) {
            log::warn!(
                "tuning: ripple_chance {} outside [0, 1], clamping",
                self.ripple_chance
            );
            self.ripple_chance = self.ripple_chance.clamp(0.0, 1.0);
        }

        // Deeper gates than the ring can hold would disable rewind entirely
        if self.rewind_min_depth >= crate::consts::SNAPSHOT_CAPACITY {
            log::warn!(
                "tuning: rewind_min_depth {} exceeds snapshot capacity",
                self.rewind_min_depth
            );
            self.rewind_min_depth = crate::consts::SNAPSHOT_CAPACITY - 1;
        }

        self
    }
}
