//! Host time types
//!
//! Millisecond resolution: every timer the engine uses is a UI delay.

use core::ops::{Add, Sub};
use serde::{Deserialize, Serialize};

/// A point in host time
///
/// Milliseconds since an arbitrary host epoch. Simulated hosts start at zero
/// and only advance when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Instant {
    millis: u64,
}

impl Instant {
    /// Creates an instant from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Returns milliseconds since epoch
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Returns the duration since another instant
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_millis(self.millis.saturating_sub(earlier.millis))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, duration: Duration) -> Self::Output {
        Instant::from_millis(self.millis.saturating_add(duration.as_millis()))
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, duration: Duration) -> Self::Output {
        Instant::from_millis(self.millis.saturating_sub(duration.as_millis()))
    }
}

/// A duration of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Duration {
    millis: u64,
}

impl Duration {
    pub const ZERO: Duration = Duration { millis: 0 };

    /// Creates a duration from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Creates a duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            millis: secs * 1_000,
        }
    }

    /// Returns the duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Returns the duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.millis / 1_000
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Self::Output {
        Duration::from_millis(self.millis.saturating_add(other.millis))
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, other: Duration) -> Self::Output {
        Duration::from_millis(self.millis.saturating_sub(other.millis))
    }
}
