//! Millisecond time base shared by all components.
//!
//! The hardware layer supplies a free-running `u32` millisecond counter that
//! wraps after ~49.7 days. [`Instant`] compares with wrapping arithmetic, so
//! deadlines stay correct across the wrap as long as they lie less than
//! `2^31` ms (~24.8 days) in the future.

/// Trait for abstracting time sources.
///
/// Reading the clock must not block and must not have side effects.
pub trait TimeSource {
    /// Returns the current time instant.
    fn now(&self) -> Instant;
}

impl<F: Fn() -> Instant> TimeSource for F {
    fn now(&self) -> Instant {
        self()
    }
}

/// A span of time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Duration(u32);

impl Duration {
    /// Zero duration constant.
    pub const ZERO: Self = Duration(0);

    /// Creates a duration from milliseconds.
    #[inline]
    pub const fn from_millis(millis: u32) -> Self {
        Duration(millis)
    }

    /// Converts duration to milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    /// Multiplies by an integer factor, saturating at `u32::MAX` ms.
    #[inline]
    pub const fn saturating_mul(self, factor: u32) -> Self {
        Duration(self.0.saturating_mul(factor))
    }
}

/// A point on the wrapping millisecond time line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    /// Creates an instant from a raw millisecond tick count.
    #[inline]
    pub const fn from_millis(millis: u32) -> Self {
        Instant(millis)
    }

    /// Returns the raw millisecond tick count.
    #[inline]
    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    /// Adds a duration, wrapping with the underlying counter.
    #[inline]
    pub const fn wrapping_add(self, duration: Duration) -> Self {
        Instant(self.0.wrapping_add(duration.0))
    }

    /// Duration elapsed since `earlier`, assuming `earlier` is not in the future.
    #[inline]
    pub const fn duration_since(&self, earlier: Self) -> Duration {
        Duration(self.0.wrapping_sub(earlier.0))
    }

    /// Returns true once `self` is at or past `deadline`.
    ///
    /// Uses the signed distance between the two counters, so a deadline that
    /// was scheduled just before the counter wrapped is still reached after it.
    #[inline]
    pub const fn has_reached(&self, deadline: Self) -> bool {
        (self.0.wrapping_sub(deadline.0) as i32) >= 0
    }

    /// Time left until `deadline`, or ZERO if it has been reached.
    #[inline]
    pub const fn until(&self, deadline: Self) -> Duration {
        if self.has_reached(deadline) {
            Duration::ZERO
        } else {
            deadline.duration_since(*self)
        }
    }
}
