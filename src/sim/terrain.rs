//! Streamed, collapsible terrain
//!
//! Segments are kept in creation order: new segments are only ever appended
//! at the tail and old ones only ever leave from the head. Intact segments
//! therefore stay sorted by `x`; broken ones freeze in place while fading.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

/// A single platform piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Leading (left) edge
    pub x: f64,
    /// Walkable surface height
    pub baseline_y: f64,
    pub width: f64,
    pub broken: bool,
    /// Render opacity, fades out once broken
    pub alpha: f64,
    /// Unique for the lifetime of a stream, never reused
    pub id: u64,
}

impl Segment {
    /// Trailing (right) edge
    #[inline]
    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width * 0.5
    }
}

/// Where a collapse happened, for particle feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collapse {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

/// Ordered run of platform segments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainStream {
    segments: Vec<Segment>,
    next_id: u64,
}

impl TerrainStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn find(&self, id: u64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Replace the live segments with a restored copy. The id counter never
    /// moves backwards so ids handed out after the restore stay unique.
    pub fn restore(&mut self, segments: &[Segment]) {
        self.segments = segments.to_vec();
        let restored_max = self.segments.iter().map(|s| s.id + 1).max().unwrap_or(0);
        self.next_id = self.next_id.max(restored_max);
    }

    /// Push a segment directly (used by scenario setups)
    pub fn push(&mut self, x: f64, baseline_y: f64, width: f64) -> u64 {
        let id = self.allocate_id();
        self.segments.push(Segment {
            x,
            baseline_y,
            width,
            broken: false,
            alpha: 1.0,
            id,
        });
        id
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lay down `count` contiguous segments starting left of the viewport
    pub fn generate_initial(&mut self, rng: &mut impl RandomSource, tuning: &Tuning, count: usize) {
        self.segments.clear();
        self.segments.reserve(count);

        let baseline = tuning.baseline();
        let mut x = tuning.initial_start_x;
        for i in 0..count {
            let width = rng.range(tuning.initial_width_min, tuning.initial_width_max);
            let wave = (i as f64 * tuning.baseline_wave_frequency).sin()
                * tuning.baseline_wave_amplitude;
            let noise = rng.range(-tuning.initial_noise, tuning.initial_noise);
            self.push(x, baseline + wave + noise, width);
            x += width;
        }
    }

    /// Append one segment butted against the current tail
    pub fn push_next(&mut self, rng: &mut impl RandomSource, tuning: &Tuning) -> u64 {
        let x = self
            .segments
            .last()
            .map(Segment::trailing_edge)
            .unwrap_or(tuning.viewport_width);
        let width = rng.range(tuning.recycled_width_min, tuning.recycled_width_max);
        let noise = rng.range(-tuning.recycled_noise, tuning.recycled_noise);
        self.push(x, tuning.baseline() + noise, width)
    }

    /// Swap offscreen head segments for fresh tail segments, one for one.
    ///
    /// A broken segment that has completely faded is offscreen too: broken
    /// segments stop scrolling, so without this a dead head would block
    /// recycling forever. Returns how many segments were recycled.
    pub fn recycle(&mut self, rng: &mut impl RandomSource, tuning: &Tuning) -> usize {
        // Each pass removes one and appends one, so one lap is enough
        let limit = self.segments.len();
        let mut recycled = 0;
        while recycled < limit {
            let Some(head) = self.segments.first() else {
                break;
            };
            let offscreen = head.trailing_edge() < tuning.recycle_threshold
                || (head.broken && head.alpha <= 0.0);
            if !offscreen {
                break;
            }
            let removed = self.segments.remove(0);
            let id = self.push_next(rng, tuning);
            log::trace!("recycled segment {} -> {}", removed.id, id);
            recycled += 1;
        }
        recycled
    }

    /// Move intact segments left; fade broken ones in place
    pub fn scroll(&mut self, tuning: &Tuning, effective_speed: f64, dt: f64) {
        for seg in &mut self.segments {
            if seg.broken {
                seg.alpha -= dt * tuning.fade_rate;
            } else {
                seg.x -= effective_speed * dt;
                seg.baseline_y += ((seg.x + seg.id as f64) * tuning.oscillation_frequency).sin()
                    * tuning.oscillation_amplitude;
            }
        }
    }

    /// Break every intact segment that has fallen far enough behind the player
    pub fn evaluate_destruction(&mut self, tuning: &Tuning, player_x: f64) -> Vec<Collapse> {
        let behind = player_x - tuning.destruction_margin;
        let mut collapsed = Vec::new();
        for seg in &mut self.segments {
            if !seg.broken && seg.trailing_edge() < behind {
                seg.broken = true;
                collapsed.push(Collapse {
                    id: seg.id,
                    x: seg.center_x(),
                    y: seg.baseline_y - 10.0,
                });
            }
        }
        collapsed
    }

    /// Possibly break the segment that follows `id`.
    ///
    /// No-op when `id` has been recycled away or is intact again (a rewind
    /// restored it), has no successor, or the successor is already broken.
    /// The successor does not propagate further.
    pub fn ripple(&mut self, rng: &mut impl RandomSource, id: u64, chance: f64) -> Option<Collapse> {
        if !self.find(id)?.broken {
            return None;
        }
        let index = self.segments.iter().position(|s| s.id == id)?;
        let next = self.segments.get_mut(index + 1)?;
        if next.broken || !rng.chance(chance) {
            return None;
        }
        next.broken = true;
        Some(Collapse {
            id: next.id,
            x: next.center_x(),
            y: next.baseline_y - 10.0,
        })
    }
}
