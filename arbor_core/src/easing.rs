// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eased interpolation as a pure function of time.
//!
//! A [`Tween`] stores where a value comes from, where it goes, when it started
//! and how long it runs. [`Tween::sample`] evaluates it at any `now`, so the
//! same tween can be driven by a display link, a timer, or a test's fake
//! clock, and sampling never mutates it.

use kurbo::{Point, Vec2};

use crate::time::{Duration, HostTime};

/// Timing curve applied to linear progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Fast start, gentle landing: `1 - (1 - t)^3`.
    #[default]
    EaseOutCubic,
    /// Slow at both ends.
    EaseInOutCubic,
}

impl Easing {
    /// Maps linear progress `t` (clamped to `[0, 1]`) through the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Linear interpolation between two values of the same type.
pub trait Lerp: Copy {
    /// Returns `self` at `t = 0` and `other` at `t = 1`.
    #[must_use]
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    #[inline]
    fn lerp(self, other: Self, t: f64) -> Self {
        Self::lerp(self, other, t)
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, other: Self, t: f64) -> Self {
        Self::lerp(self, other, t)
    }
}

/// An eased transition from one value to another over a time window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: HostTime,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// Creates a tween starting at `start`.
    #[must_use]
    pub fn new(from: T, to: T, start: HostTime, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Eased progress in `[0, 1]` at `now`.
    #[must_use]
    pub fn progress(&self, now: HostTime) -> f64 {
        let elapsed = now.saturating_duration_since(self.start);
        self.easing.apply(elapsed.fraction_of(self.duration))
    }

    /// The interpolated value at `now`. Exactly `target()` once finished.
    #[must_use]
    pub fn sample(&self, now: HostTime) -> T {
        if self.is_finished(now) {
            return self.to;
        }
        self.from.lerp(self.to, self.progress(now))
    }

    /// Returns `true` once `now` has reached the end of the window.
    #[must_use]
    pub fn is_finished(&self, now: HostTime) -> bool {
        now >= self.end()
    }

    /// The time at which the tween reaches its target.
    #[must_use]
    pub fn end(&self) -> HostTime {
        self.start + self.duration
    }

    /// The value the tween is heading to.
    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }

    /// The value the tween started from.
    #[must_use]
    pub fn origin(&self) -> T {
        self.from
    }

    /// Starts a new window at `now` from the current sample toward `to`.
    pub fn retarget(&mut self, now: HostTime, to: T, duration: Duration) {
        self.from = self.sample(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
    }

    /// Steers toward `to` from the current sample, keeping the original end
    /// time.
    pub fn redirect(&mut self, now: HostTime, to: T) {
        let end = self.end();
        self.from = self.sample(now);
        self.to = to;
        self.start = now;
        self.duration = end.saturating_duration_since(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_their_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOutCubic, Easing::EaseInOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(2.0), 1.0, "{easing:?} clamps");
        }
        assert_eq!(Easing::EaseOutCubic.apply(0.5), 0.875);
        assert_eq!(Easing::EaseInOutCubic.apply(0.5), 0.5);
    }

    #[test]
    fn sample_is_pure_and_lands_exactly() {
        let tween = Tween::new(0.0, 10.0, HostTime(100), Duration(100), Easing::Linear);
        assert_eq!(tween.sample(HostTime(50)), 0.0, "before start");
        assert_eq!(tween.sample(HostTime(150)), 5.0);
        assert_eq!(tween.sample(HostTime(150)), 5.0, "sampling twice is stable");
        assert_eq!(tween.sample(HostTime(200)), 10.0);
        assert!(tween.is_finished(HostTime(200)));
    }

    #[test]
    fn zero_duration_is_immediately_finished() {
        let tween = Tween::new(
            Point::ZERO,
            Point::new(3.0, 4.0),
            HostTime(7),
            Duration::ZERO,
            Easing::EaseOutCubic,
        );
        assert_eq!(tween.sample(HostTime(7)), Point::new(3.0, 4.0));
    }

    #[test]
    fn retarget_continues_from_current_value() {
        let mut tween = Tween::new(0.0, 100.0, HostTime(0), Duration(100), Easing::Linear);
        tween.retarget(HostTime(50), -20.0, Duration(40));
        assert_eq!(tween.origin(), 50.0);
        assert_eq!(tween.sample(HostTime(50)), 50.0, "no jump");
        assert_eq!(tween.end(), HostTime(90));
        assert_eq!(tween.sample(HostTime(90)), -20.0);
    }

    #[test]
    fn redirect_keeps_the_end_time() {
        let mut tween = Tween::new(0.0, 100.0, HostTime(0), Duration(100), Easing::Linear);
        tween.redirect(HostTime(25), 40.0);
        assert_eq!(tween.sample(HostTime(25)), 25.0, "no jump");
        assert_eq!(tween.end(), HostTime(100));
        assert_eq!(tween.sample(HostTime(100)), 40.0);

        // Past the end, a redirect lands immediately.
        tween.redirect(HostTime(500), 7.0);
        assert_eq!(tween.sample(HostTime(500)), 7.0);
    }
}
