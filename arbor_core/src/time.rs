// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time for animations and deferred removals.
//!
//! Nothing in this crate reads a clock. Every operation that animates or
//! schedules takes an explicit `now: HostTime`, so a host drives it from
//! `requestAnimationFrame`, a timer, or a fake clock in tests.
//!
//! [`HostTime`] and [`Duration`] are raw monotonic ticks. [`Timebase`] is the
//! rational ticks → nanoseconds factor (`nanoseconds = ticks * numer / denom`)
//! that configuration uses to turn millisecond durations into ticks.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    ///
    /// A clock that steps backwards therefore freezes animations instead of
    /// running them in reverse.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Saturating addition of a duration.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
///
/// Both terms are non-zero; conversions divide by either one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    numer: u32,
    denom: u32,
}

impl Timebase {
    /// Ticks are nanoseconds.
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Ticks are microseconds (the resolution of `performance.now()` clocks).
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `numer` or `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(numer != 0, "timebase numerator must not be zero");
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Numerator of the ticks-to-nanoseconds ratio.
    #[inline]
    #[must_use]
    pub const fn numer(self) -> u32 {
        self.numer
    }

    /// Denominator of the ticks-to-nanoseconds ratio.
    #[inline]
    #[must_use]
    pub const fn denom(self) -> u32 {
        self.denom
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in the same tick units as [`HostTime`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns `true` for a zero-length duration.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Creates a duration from milliseconds in the given timebase.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(millis.saturating_mul(1_000_000)))
    }

    /// Converts this duration to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }

    /// Returns `self / total` as a fraction clamped to `[0, 1]`.
    ///
    /// A zero `total` counts as already complete.
    #[inline]
    #[must_use]
    pub fn fraction_of(self, total: Self) -> f64 {
        if total.0 == 0 || self.0 >= total.0 {
            return 1.0;
        }
        self.0 as f64 / total.0 as f64
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_in_nanosecond_timebase() {
        let d = Duration::from_millis(250, Timebase::NANOS);
        assert_eq!(d.ticks(), 250_000_000);
        assert_eq!(d.to_nanos(Timebase::NANOS), 250_000_000);
    }

    #[test]
    fn millis_in_microsecond_timebase() {
        let d = Duration::from_millis(16, Timebase::MICROS);
        assert_eq!(d.ticks(), 16_000, "1 tick = 1 µs");
        assert_eq!(d.to_nanos(Timebase::MICROS), 16_000_000);
    }

    #[test]
    fn millis_in_a_rational_timebase() {
        // 3 ticks per 125 ns, i.e. a 24 MHz counter.
        let tb = Timebase::new(125, 3);
        assert_eq!(Duration::from_millis(1, tb).ticks(), 24_000);
        assert_eq!(Duration(24_000).to_nanos(tb), 1_000_000);
        assert_eq!((tb.numer(), tb.denom()), (125, 3));
    }

    #[test]
    #[should_panic(expected = "timebase numerator must not be zero")]
    fn zero_numerator_is_rejected() {
        let _ = Timebase::new(0, 1);
    }

    #[test]
    #[should_panic(expected = "timebase denominator must not be zero")]
    fn zero_denominator_is_rejected() {
        let _ = Timebase::new(1, 0);
    }

    #[test]
    fn fraction_clamps_and_handles_zero_total() {
        assert_eq!(Duration(50).fraction_of(Duration(200)), 0.25);
        assert_eq!(Duration(500).fraction_of(Duration(200)), 1.0);
        assert_eq!(Duration(0).fraction_of(Duration::ZERO), 1.0);
    }

    #[test]
    fn backwards_clock_saturates() {
        let earlier = HostTime(1_000);
        let later = HostTime(1_500);
        assert_eq!(later - earlier, Duration(500));
        assert_eq!(earlier - later, Duration::ZERO);
        assert_eq!(earlier + Duration(250), HostTime(1_250));
    }
}
