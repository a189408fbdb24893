//! Stable handles for kernel entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for a task
///
/// Task handles are small integers assigned sequentially by the kernel.
/// They index into kernel-owned storage; callers never hold a reference
/// to the task control block itself. Handle 0 is always the built-in
/// idle task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task handle from its raw value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task:{}", self.0)
    }
}

/// Stable handle for a lock
///
/// Covers both lock flavors (priority-inheriting mutex and plain binary
/// semaphore); the flavor is fixed at creation and not encoded in the
/// handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LockId(u64);

impl LockId {
    /// Creates a lock handle from its raw value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_round_trip() {
        let id = TaskId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
    }

    #[test]
    fn test_task_id_ordering() {
        let a = TaskId::from_raw(1);
        let b = TaskId::from_raw(2);
        assert!(a < b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_lock_id_round_trip() {
        let id = LockId::from_raw(3);
        assert_eq!(id.as_raw(), 3);
    }

    #[test]
    fn test_task_id_display() {
        let id = TaskId::from_raw(4);
        assert_eq!(format!("{}", id), "task:4");
    }

    #[test]
    fn test_lock_id_display() {
        let id = LockId::from_raw(0);
        assert_eq!(format!("{}", id), "lock:0");
    }

    #[test]
    fn test_ids_serialize_as_integers() {
        let json = serde_json::to_string(&TaskId::from_raw(12)).unwrap();
        assert_eq!(json, "12");
        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaskId::from_raw(12));
    }
}
