//! Player kinematics and ground contact
//!
//! Horizontal motion is direct displacement; only the vertical axis carries
//! velocity. Support is found by scanning the terrain in order and the last
//! matching segment wins, so when two segments overlap the tolerance zone the
//! one further along the stream decides the snap height.

use serde::{Deserialize, Serialize};

use super::terrain::Segment;
use crate::tuning::Tuning;

/// Movement state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Grounded,
    Airborne,
    /// Fell out of the world; only a restart leaves this state
    Fallen,
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Horizontal center
    pub x: f64,
    /// Top edge (feet at `y + h`)
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub vy: f64,
    pub grounded: bool,
    /// -1 facing left, 1 facing right
    pub facing: i8,
    /// Simulation time of the last successful dash
    pub last_dash_time: f64,
}

impl PlayerBody {
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            x: tuning.player_spawn_x,
            y: tuning.viewport_height * 0.5,
            w: tuning.player_width,
            h: tuning.player_height,
            vy: 0.0,
            grounded: false,
            facing: 1,
            last_dash_time: -10.0,
        }
    }

    pub fn stance(&self) -> Stance {
        if self.grounded {
            Stance::Grounded
        } else {
            Stance::Airborne
        }
    }

    /// Immediate horizontal displacement; `direction` is -1, 0 or 1
    pub fn walk(&mut self, direction: i8, speed: f64, dt: f64) {
        if direction == 0 {
            return;
        }
        self.x += f64::from(direction) * speed * dt;
        self.facing = direction.signum();
    }

    /// Leave the ground with an upward impulse. Ignored while airborne.
    pub fn jump(&mut self, impulse: f64) -> bool {
        if !self.grounded {
            return false;
        }
        self.vy = impulse;
        self.grounded = false;
        true
    }

    /// Gravity into `vy`, damping, then `vy` into `y`
    pub fn integrate(&mut self, gravity: f64, friction: f64, dt: f64) {
        self.vy += gravity * dt;
        self.vy *= friction;
        self.y += self.vy * dt;
    }

    /// Does `seg` hold the player up this tick?
    pub fn is_supported_by(&self, seg: &Segment, tuning: &Tuning) -> bool {
        if seg.broken {
            return false;
        }
        let half = self.w * 0.5;
        let overlaps = self.x + half > seg.x - tuning.support_tolerance
            && self.x - half < seg.trailing_edge() + tuning.support_tolerance;
        if !overlaps {
            return false;
        }
        let ground_y = seg.baseline_y - self.h;
        self.y >= ground_y && self.y < ground_y + tuning.support_band && self.vy >= tuning.max_snap_rise
    }

    /// Snap onto the last supporting segment, if any. Returns its id.
    pub fn resolve_ground(&mut self, segments: &[Segment], tuning: &Tuning) -> Option<u64> {
        self.grounded = false;
        let mut support = None;
        for seg in segments {
            if self.is_supported_by(seg, tuning) {
                self.y = seg.baseline_y - self.h;
                self.vy = 0.0;
                self.grounded = true;
                support = Some(seg.id);
            }
        }
        support
    }

    /// Keep `y` inside the visible band. Returns the unclamped value.
    pub fn clamp_to_view(&mut self, tuning: &Tuning) -> f64 {
        let raw = self.y;
        self.y = self.y.clamp(tuning.min_visible_y, tuning.max_visible_y());
        raw
    }

    /// Has an unclamped height dropped out of the world?
    pub fn has_fallen(raw_y: f64, tuning: &Tuning) -> bool {
        raw_y > tuning.viewport_height + tuning.fall_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::TerrainStream;

    fn player_at(x: f64, y: f64, vy: f64) -> PlayerBody {
        PlayerBody {
            x,
            y,
            vy,
            ..PlayerBody::spawn(&Tuning::default())
        }
    }

    #[test]
    fn test_walk_sets_facing() {
        let mut player = player_at(200.0, 300.0, 0.0);
        player.walk(-1, 180.0, 0.5);
        assert_eq!(player.x, 110.0);
        assert_eq!(player.facing, -1);
        player.walk(0, 180.0, 0.5);
        assert_eq!(player.facing, -1);
        player.walk(1, 180.0, 0.5);
        assert_eq!(player.x, 200.0);
        assert_eq!(player.facing, 1);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = player_at(200.0, 300.0, 0.0);
        assert!(!player.jump(-520.0));
        assert_eq!(player.vy, 0.0);

        player.grounded = true;
        assert!(player.jump(-520.0));
        assert_eq!(player.vy, -520.0);
        assert_eq!(player.stance(), Stance::Airborne);
    }

    #[test]
    fn test_snap_to_surface() {
        let tuning = Tuning::default();
        let mut terrain = TerrainStream::new();
        let id = terrain.push(100.0, 500.0, 300.0);
        let mut player = player_at(200.0, 470.0, 300.0);

        assert_eq!(player.resolve_ground(terrain.segments(), &tuning), Some(id));
        assert_eq!(player.y, 452.0);
        assert_eq!(player.vy, 0.0);
        assert_eq!(player.stance(), Stance::Grounded);
    }

    #[test]
    fn test_no_snap_while_rising_fast() {
        let tuning = Tuning::default();
        let mut terrain = TerrainStream::new();
        terrain.push(100.0, 500.0, 300.0);
        let mut player = player_at(200.0, 460.0, -400.0);

        assert_eq!(player.resolve_ground(terrain.segments(), &tuning), None);
        assert!(!player.grounded);
        assert_eq!(player.y, 460.0);
    }

    #[test]
    fn test_no_snap_below_band_or_on_broken() {
        let tuning = Tuning::default();
        let mut terrain = TerrainStream::new();
        terrain.push(100.0, 500.0, 300.0);
        let mut deep = player_at(200.0, 500.0, 100.0);
        assert_eq!(deep.resolve_ground(terrain.segments(), &tuning), None);

        let mut broken = TerrainStream::new();
        broken.push(100.0, 500.0, 300.0);
        let mut segs = broken.segments().to_vec();
        segs[0].broken = true;
        let mut player = player_at(200.0, 460.0, 100.0);
        assert_eq!(player.resolve_ground(&segs, &tuning), None);
    }

    #[test]
    fn test_lateral_tolerance() {
        let tuning = Tuning::default();
        let mut terrain = TerrainStream::new();
        terrain.push(100.0, 500.0, 300.0);
        // Right edge of the body is 18px left of the segment, inside the 20px tolerance
        let mut near = player_at(100.0 - 18.0 - 18.0 + 1.0, 460.0, 0.0);
        assert!(near.resolve_ground(terrain.segments(), &tuning).is_some());

        let mut far = player_at(100.0 - 20.0 - 18.0 - 1.0, 460.0, 0.0);
        assert!(far.resolve_ground(terrain.segments(), &tuning).is_none());
    }

    #[test]
    fn test_last_matching_segment_wins() {
        let tuning = Tuning::default();
        let mut terrain = TerrainStream::new();
        terrain.push(0.0, 500.0, 210.0);
        let second = terrain.push(210.0, 490.0, 200.0);
        // Body straddles both segments, both within the band
        let mut player = player_at(210.0, 455.0, 50.0);

        assert_eq!(player.resolve_ground(terrain.segments(), &tuning), Some(second));
        assert_eq!(player.y, 490.0 - 48.0);
    }

    #[test]
    fn test_clamp_reports_raw_height() {
        let tuning = Tuning::default();
        let mut player = player_at(200.0, 900.0, 0.0);
        let raw = player.clamp_to_view(&tuning);
        assert_eq!(raw, 900.0);
        assert_eq!(player.y, tuning.max_visible_y());
        assert!(PlayerBody::has_fallen(raw, &tuning));
        assert!(!PlayerBody::has_fallen(tuning.max_visible_y(), &tuning));

        let mut high = player_at(200.0, -50.0, 0.0);
        high.clamp_to_view(&tuning);
        assert_eq!(high.y, 20.0);
    }
}
