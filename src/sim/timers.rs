//! Deferred effects keyed on simulation time
//!
//! Nothing fires from wall-clock callbacks. Effects are queued with a due
//! time and drained once per tick, and a reset drops them all.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredEffect {
    /// Try to break the segment after `segment_id`
    Ripple { segment_id: u64 },
    /// End a dash slowdown
    RestoreScroll { speed: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    due: f64,
    effect: DeferredEffect,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything still waiting
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn schedule(&mut self, due: f64, effect: DeferredEffect) {
        self.pending.push(Pending { due, effect });
    }

    /// Keep only the pending effects `keep` accepts
    pub fn retain(&mut self, mut keep: impl FnMut(&DeferredEffect) -> bool) {
        self.pending.retain(|p| keep(&p.effect));
    }

    /// Earliest pending end of a dash slowdown
    pub fn scroll_restore_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .filter(|p| matches!(p.effect, DeferredEffect::RestoreScroll { .. }))
            .map(|p| p.due)
            .min_by(f64::total_cmp)
    }

    /// Remove and return every effect due at `now`, earliest first.
    /// Effects with equal due times keep their scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<DeferredEffect> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|p| p.effect).collect()
    }
}
