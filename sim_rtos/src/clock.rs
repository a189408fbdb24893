//! # Simulated Clock
//!
//! Deterministic time source for the kernel.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! The clock counts cycles (the runtime-accounting unit) and derives ticks
//! (the scheduling unit) from them. It only advances when explicitly told
//! to do so, which makes every schedule reproducible: same inputs, same
//! advancement calls, same interleaving.

/// Simulated clock with controllable progression
///
/// A fixed number of cycles (`cycles_per_tick`) makes up one scheduler
/// tick. The kernel advances the clock cycle by cycle while attributing
/// runtime, and runs tick-boundary work whenever the cycle count crosses
/// a tick multiple.
///
/// # Examples
///
/// ```
/// use sim_rtos::clock::SimClock;
///
/// let mut clock = SimClock::new(1000);
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance_cycles(1500);
/// assert_eq!(clock.current_tick(), 1);
/// assert_eq!(clock.cycles_into_tick(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Cycles elapsed since construction
    cycles: u64,
    /// Cycles per scheduler tick
    cycles_per_tick: u64,
}

impl SimClock {
    /// Creates a clock starting at cycle 0
    ///
    /// # Panics
    ///
    /// Panics if `cycles_per_tick` is zero.
    pub fn new(cycles_per_tick: u64) -> Self {
        assert!(cycles_per_tick > 0, "cycles_per_tick must be nonzero");
        Self {
            cycles: 0,
            cycles_per_tick,
        }
    }

    /// Advances the clock by the given number of cycles
    ///
    /// # Panics
    ///
    /// Panics if advancing would overflow u64 (extremely unlikely).
    pub fn advance_cycles(&mut self, delta: u64) {
        self.cycles = self
            .cycles
            .checked_add(delta)
            .expect("Clock cycle overflow");
    }

    /// Returns cycles elapsed since construction
    pub fn current_cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the current tick count
    pub fn current_tick(&self) -> u64 {
        self.cycles / self.cycles_per_tick
    }

    /// Returns cycles elapsed within the current tick
    pub fn cycles_into_tick(&self) -> u64 {
        self.cycles % self.cycles_per_tick
    }

    /// Returns cycles remaining until the next tick boundary
    ///
    /// On a boundary this is a full tick, so advancing by the returned
    /// amount always lands exactly on the next boundary.
    pub fn cycles_until_next_tick(&self) -> u64 {
        self.cycles_per_tick - self.cycles_into_tick()
    }

    /// Whether the clock sits exactly on a tick boundary
    pub fn is_on_tick_boundary(&self) -> bool {
        self.cycles_into_tick() == 0
    }
}
