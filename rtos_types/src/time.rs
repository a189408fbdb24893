//! Time abstractions
//!
//! Simulated time is counted in ticks (the scheduling unit). Cycle-level
//! accounting inside the kernel uses bare `u64` counters; `Ticks` is the
//! type that crosses the API boundary in delays and timeouts.

use core::ops::Add;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A duration measured in scheduler ticks
///
/// Time in the simulation is virtual: ticks elapse only when the harness
/// advances the kernel. `Ticks::FOREVER` is the explicit no-deadline
/// sentinel used for blocking lock acquisitions that should never time
/// out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticks(u64);

impl Ticks {
    /// Zero ticks
    pub const ZERO: Ticks = Ticks(0);

    /// The no-deadline sentinel
    ///
    /// A take with this timeout waits indefinitely. Represented as
    /// `u64::MAX`; arithmetic saturates so a deadline computed from it
    /// stays unreachable.
    pub const FOREVER: Ticks = Ticks(u64::MAX);

    /// Creates a tick count
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Whether this is the no-deadline sentinel
    pub const fn is_forever(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Whether this is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturating addition of a raw tick count
    pub const fn saturating_add(self, ticks: u64) -> Ticks {
        Ticks(self.0.saturating_add(ticks))
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, other: Ticks) -> Self::Output {
        Ticks(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_forever() {
            write!(f, "forever")
        } else {
            write!(f, "{} ticks", self.0)
        }
    }
}
