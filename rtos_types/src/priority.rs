//! Fixed scheduling priority levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed scheduling priority of a task
///
/// Higher numeric value means more urgent. Level 0 is where the built-in
/// idle task lives; application tasks normally use level 1 and above,
/// though nothing stops one from sharing the idle level. The kernel
/// clamps requested priorities to its configured maximum level, so a
/// `Priority` by itself carries no upper bound.
///
/// Ordering comes from `Ord`; priorities are compared, never added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(u8);

impl Priority {
    /// The idle level, home of the built-in idle task
    pub const IDLE: Priority = Priority(0);

    /// Creates a priority from its numeric level
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Returns the numeric level
    pub const fn level(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prio:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::new(5) > Priority::new(3));
        assert!(Priority::IDLE < Priority::new(1));
    }

    #[test]
    fn test_priority_level() {
        assert_eq!(Priority::new(7).level(), 7);
        assert_eq!(Priority::IDLE.level(), 0);
    }

    #[test]
    fn test_priority_min_max_via_ord() {
        let low = Priority::new(1);
        let high = Priority::new(5);
        assert_eq!(low.max(high), high);
        assert_eq!(low.min(high), low);
        assert_eq!(high.max(high), high);
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(format!("{}", Priority::new(3)), "prio:3");
    }
}
