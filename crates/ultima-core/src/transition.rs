//! Easing curves and time-driven transitions.
//!
//! Transitions are advanced explicitly from [`crate::Widget::on_frame`];
//! nothing here reads a wall clock.

use std::time::Duration;

/// Standard easing functions for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// Cubic ease out
    CubicOut,
    /// Cubic ease in and out
    CubicInOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    (4.0 - 2.0 * t).mul_add(t, -1.0)
                }
            }
            Self::CubicOut => {
                let f = t - 1.0;
                (f * f).mul_add(f, 1.0)
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = 2.0f32.mul_add(t, -2.0);
                    (0.5 * f * f).mul_add(f, 1.0)
                }
            }
        }
    }
}

/// A value eased from `from` to `to` over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Transition {
    /// Create a transition that starts at `from`.
    #[must_use]
    pub const fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// A finished transition resting at `value`.
    #[must_use]
    pub const fn settled(value: f32) -> Self {
        Self::new(value, value, Duration::ZERO)
    }

    /// Set easing function.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Restart towards `to` from the current value.
    pub fn retarget(&mut self, to: f32, duration: Duration) {
        self.from = self.value();
        self.to = to;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
    }

    /// Advance by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Progress from 0.0 to 1.0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
        }
    }

    /// Current eased value.
    #[must_use]
    pub fn value(&self) -> f32 {
        let eased = self.easing.apply(self.progress());
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Target value.
    #[must_use]
    pub const fn target(&self) -> f32 {
        self.to
    }

    /// Whether the transition has reached its target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::settled(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::CubicOut,
        Easing::CubicInOut,
    ];

    #[test]
    fn test_easing_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn test_easing_in_out_midpoint() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_transition_advance() {
        let mut t = Transition::new(0.0, 1.0, Duration::from_millis(200));
        t.advance(Duration::from_millis(100));
        assert!((t.value() - 0.5).abs() < 1e-6);
        assert!(!t.is_complete());
        t.advance(Duration::from_millis(500));
        assert!(t.is_complete());
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn test_transition_zero_duration_is_complete() {
        let t = Transition::settled(0.7);
        assert!(t.is_complete());
        assert_eq!(t.value(), 0.7);
    }

    #[test]
    fn test_transition_retarget_starts_from_current() {
        let mut t = Transition::new(0.0, 1.0, Duration::from_millis(100));
        t.advance(Duration::from_millis(50));
        t.retarget(0.0, Duration::from_millis(100));
        assert!((t.value() - 0.5).abs() < 1e-6);
        assert_eq!(t.target(), 0.0);
        t.advance(Duration::from_millis(100));
        assert_eq!(t.value(), 0.0);
    }
}
