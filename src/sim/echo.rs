//! Echo ghost: a replay of the player's recent path
//!
//! The recorder runs every tick whether or not a ghost is out. Triggering
//! copies the recorded path into a ghost that steps through it one point per
//! tick and then disappears.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoPathPoint {
    pub pos: DVec2,
    /// Simulation time of the sample
    pub t: f64,
}

/// Rolling record of recent player positions
#[derive(Debug, Clone)]
pub struct EchoRecorder {
    path: VecDeque<EchoPathPoint>,
    capacity: usize,
}

impl EchoRecorder {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            path: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn clear(&mut self) {
        self.path.clear();
    }

    pub fn record(&mut self, pos: DVec2, t: f64) {
        if self.path.len() == self.capacity {
            self.path.pop_front();
        }
        self.path.push_back(EchoPathPoint { pos, t });
    }

    /// Owned copy of the path, oldest first
    pub fn copy_path(&self) -> Vec<EchoPathPoint> {
        self.path.iter().copied().collect()
    }
}

/// A live ghost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub path: Vec<EchoPathPoint>,
    pub index: usize,
    /// Last displayed point; `None` until the first step
    pub pose: Option<DVec2>,
}

impl Echo {
    pub fn new(path: Vec<EchoPathPoint>) -> Self {
        Self {
            path,
            index: 0,
            pose: None,
        }
    }

    /// Show the next recorded point. Returns false once the path is used up.
    pub fn advance(&mut self) -> bool {
        match self.path.get(self.index) {
            Some(point) => {
                self.pose = Some(point.pos);
                self.index += 1;
                true
            }
            None => false,
        }
    }
}

/// Slot holding at most one ghost
#[derive(Debug, Clone, Default)]
pub struct EchoPlayer {
    active: Option<Echo>,
}

impl EchoPlayer {
    pub fn active(&self) -> Option<&Echo> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn pose(&self) -> Option<DVec2> {
        self.active.as_ref().and_then(|e| e.pose)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Launch a ghost from the recorder's path. Refused while one is out or
    /// when fewer than `min_len` points are recorded.
    pub fn trigger(&mut self, recorder: &EchoRecorder, min_len: usize) -> bool {
        if self.active.is_some() || recorder.len() < min_len {
            return false;
        }
        self.active = Some(Echo::new(recorder.copy_path()));
        true
    }

    /// Step the ghost, dropping it once its path is exhausted
    pub fn update(&mut self) {
        let finished = match &mut self.active {
            Some(echo) => !echo.advance(),
            None => false,
        };
        if finished {
            self.active = None;
        }
    }
}
