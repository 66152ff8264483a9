//! Easing curves and looping tweens

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing functions used to map normalized tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    /// Quadratic ease-in/out
    QuadInOut,
    /// Sinusoidal ease-in/out
    #[default]
    SineInOut,
}

impl Ease {
    /// Apply this easing function to progress `t` in [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A tween that runs forward then backward forever (repeat + yoyo)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub from: f32,
    pub to: f32,
    /// Seconds for one leg (from -> to)
    pub duration: f32,
    pub ease: Ease,
}

impl Oscillator {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            ease: Ease::SineInOut,
        }
    }

    /// Value at `time` seconds after the tween started
    pub fn sample(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return self.from;
        }
        let legs = (time.max(0.0) / self.duration).max(0.0);
        let leg = legs.floor();
        let mut frac = legs - leg;
        if (leg as u64) % 2 == 1 {
            frac = 1.0 - frac;
        }
        lerp(self.from, self.to, self.ease.apply(frac))
    }
}

/// One-shot tween from 0 to 1 (used for fade-in)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub elapsed: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Fade {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            ease: Ease::QuadInOut,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.ease.apply(self.elapsed / self.duration)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Linear, Ease::QuadInOut, Ease::SineInOut] {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
            assert!((ease.apply(0.5) - 0.5).abs() < 1e-6, "{ease:?} at 0.5");
        }
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(Ease::QuadInOut.apply(-1.0), 0.0);
        assert_eq!(Ease::QuadInOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_oscillator_yoyo() {
        let osc = Oscillator::new(25.0, 23.0, 0.8);
        assert!((osc.sample(0.0) - 25.0).abs() < 1e-4);
        assert!((osc.sample(0.8) - 23.0).abs() < 1e-3);
        // Back at the start after two legs
        assert!((osc.sample(1.6) - 25.0).abs() < 1e-3);
        // Symmetric around the turning point
        assert!((osc.sample(0.6) - osc.sample(1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_fade_reaches_one() {
        let mut fade = Fade::new(0.5);
        assert_eq!(fade.value(), 0.0);
        fade.advance(0.25);
        assert!((fade.value() - 0.5).abs() < 1e-5);
        fade.advance(1.0);
        assert!(fade.is_done());
        assert_eq!(fade.value(), 1.0);
    }
}
