//! Simulated clock.
//!
//! The simulation never reads the wall clock. Hosts feed elapsed seconds
//! through `tick`, and every timestamp the core records is a `SimTime`.

use serde::{Deserialize, Serialize};

/// A point on the simulated timeline, in whole seconds since session start.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    /// Session start.
    pub const ZERO: Self = Self(0);

    /// Creates a time from raw seconds.
    #[must_use]
    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the raw seconds.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.0
    }

    /// Returns this time moved forward by `seconds`, saturating at the end of the timeline.
    #[must_use]
    pub const fn advanced_by(self, seconds: u64) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Seconds elapsed since `earlier` (zero if `earlier` is in the future).
    #[must_use]
    pub const fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hours = self.0 / 3600;
        let mins = (self.0 % 3600) / 60;
        let secs = self.0 % 60;
        write!(f, "{hours}:{mins:02}:{secs:02}")
    }
}
