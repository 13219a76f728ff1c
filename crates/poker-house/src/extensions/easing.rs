//! Easing curves for timed session effects.

use std::f32::consts::PI;

/// Curve over normalized time. Every curve runs from 0 at `t = 0` to 1 at `t = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Half a cosine wave: gentle at both ends.
    SineInOut,
    /// Cubic Hermite `3t² - 2t³`.
    SmoothStep,
}

impl Easing {
    /// `t` is clamped to [0, 1] first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineInOut => 0.5 - 0.5 * (PI * t).cos(),
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// The curve run backwards, 1 -> 0.
    pub fn apply_reversed(self, t: f32) -> f32 {
        1.0 - self.apply(t)
    }
}

/// Blend from `from` to `to` along `easing`.
pub fn ease(from: f32, to: f32, t: f32, easing: Easing) -> f32 {
    from + (to - from) * easing.apply(t)
}
