//! Rewind history
//!
//! One deep copy of the world per tick, oldest evicted first. Particles and
//! the echo ghost are not part of a snapshot and keep running forward while
//! everything else is rewound.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::player::PlayerBody;
use super::terrain::Segment;

/// Independent copy of the rewindable world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerBody,
    pub terrain: Vec<Segment>,
    pub distance: f64,
    pub scroll_speed: f64,
    /// Seconds left on a dash slowdown (0 when scrolling at full speed)
    pub slow_remaining: f64,
    pub energy: f64,
}

/// Fixed-capacity FIFO of snapshots
#[derive(Debug, Clone)]
pub struct SnapshotRing {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl SnapshotRing {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append, evicting the oldest entry once full
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Step back up to `steps` times, dropping the newest entry each step.
    ///
    /// Returns the state to restore (the entry that is now newest), or `None`
    /// when fewer than two snapshots exist or `steps` is zero.
    pub fn rewind(&mut self, steps: usize) -> Option<Snapshot> {
        if self.entries.len() < 2 {
            return None;
        }
        let steps = steps.min(self.entries.len() - 1);
        if steps == 0 {
            return None;
        }
        for _ in 0..steps {
            self.entries.pop_back();
        }
        self.entries.back().cloned()
    }
}
