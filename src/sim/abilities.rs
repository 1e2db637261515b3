//! Dash, echo and rewind
//!
//! Each ability checks all of its gates before touching anything, so a
//! refused use leaves the world exactly as it was.

use super::meter::Ability;
use super::state::Simulation;
use super::timers::DeferredEffect;

impl Simulation {
    /// Forward impulse plus a temporary scroll slowdown.
    ///
    /// Needs the energy, a finished cooldown and enough time since the last
    /// dash; the cooldown and the interval are separate gates.
    pub fn try_dash(&mut self) -> bool {
        let tuning = &self.tuning;
        if !self.meter.can_afford(tuning.dash_cost) {
            log::debug!("dash refused: energy {:.1}", self.meter.energy);
            return false;
        }
        if self.meter.is_cooling(Ability::Dash) {
            log::debug!("dash refused: cooldown {:.2}s", self.meter.dash_cooldown);
            return false;
        }
        if self.time - self.player.last_dash_time <= tuning.dash_min_interval {
            log::debug!("dash refused: too soon after last dash");
            return false;
        }

        let restore_at = self.time + tuning.dash_slow_duration;
        let base_speed = tuning.base_speed;
        self.player.last_dash_time = self.time;
        self.player.x += tuning.dash_impulse;
        self.scroll_speed = base_speed * tuning.dash_slow_factor;
        self.meter.spend(self.tuning.dash_cost);
        self.meter.start_cooldown(Ability::Dash, &self.tuning);
        self.timers
            .schedule(restore_at, DeferredEffect::RestoreScroll { speed: base_speed });
        log::debug!("dash at t={:.2}", self.time);
        true
    }

    /// Launch a ghost replaying the recorded path. Costs no energy.
    pub fn try_echo(&mut self) -> bool {
        if self.meter.is_cooling(Ability::Echo) {
            log::debug!("echo refused: cooldown {:.2}s", self.meter.echo_cooldown);
            return false;
        }
        if !self.echo.trigger(&self.recorder, self.tuning.echo_min_path) {
            log::debug!(
                "echo refused: active={} path={}",
                self.echo.is_active(),
                self.recorder.len()
            );
            return false;
        }
        self.meter.start_cooldown(Ability::Echo, &self.tuning);
        log::debug!("echo launched with {} points", self.recorder.len());
        true
    }

    /// Rewind burst. The cost is charged against the restored energy.
    pub fn try_rewind(&mut self) -> bool {
        let tuning = &self.tuning;
        if self.meter.is_cooling(Ability::Rewind) {
            log::debug!("rewind refused: cooldown {:.2}s", self.meter.rewind_cooldown);
            return false;
        }
        if !self.meter.can_afford(tuning.rewind_cost) {
            log::debug!("rewind refused: energy {:.1}", self.meter.energy);
            return false;
        }
        if self.snapshots.len() <= tuning.rewind_min_depth {
            log::debug!("rewind refused: only {} snapshots", self.snapshots.len());
            return false;
        }

        let steps = tuning.rewind_steps;
        if !self.rewind(steps) {
            return false;
        }
        self.meter.spend(self.tuning.rewind_cost);
        self.meter.start_cooldown(Ability::Rewind, &self.tuning);
        log::debug!(
            "rewound {} steps, {} snapshots left",
            steps,
            self.snapshots.len()
        );
        true
    }
}
