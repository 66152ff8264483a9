//! Swimming wiggle: tail swing, body squeeze and patch shimmer
//!
//! Runs on its own clock. Path traversal restarts never touch it except to
//! reset the phase on a loop restart.

use serde::{Deserialize, Serialize};

use super::ease::Oscillator;
use crate::consts::{BODY_RY, BODY_RY_SQUEEZED};

/// Half-period of the tail and body tweens (seconds)
pub const WIGGLE_PERIOD: f32 = 0.8;
/// Tail control point swing (body units)
pub const TAIL_SWING: f32 = 6.0;
/// Peak patch scale
pub const PATCH_PULSE: f32 = 1.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wiggle {
    pub elapsed: f32,
    body: Oscillator,
    tail: Oscillator,
}

impl Default for Wiggle {
    fn default() -> Self {
        Self::new()
    }
}

impl Wiggle {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            body: Oscillator::new(1.0, BODY_RY_SQUEEZED / BODY_RY, WIGGLE_PERIOD),
            tail: Oscillator::new(-TAIL_SWING, TAIL_SWING, WIGGLE_PERIOD),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Restart from phase zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Body semi-minor axis for an unsqueezed `ry`
    pub fn body_ry(&self, ry: f32) -> f32 {
        ry * self.body.sample(self.elapsed)
    }

    /// Vertical offset applied to the tail's control points
    pub fn tail_swing(&self) -> f32 {
        self.tail.sample(self.elapsed)
    }

    /// Scale of patch `index`; later patches breathe more slowly
    pub fn patch_scale(&self, index: usize) -> f32 {
        Oscillator::new(1.0, PATCH_PULSE, 1.5 + index as f32 * 0.3).sample(self.elapsed)
    }
}
