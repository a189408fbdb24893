//! Kernel error types

use rtos_types::{LockId, TaskId};
use thiserror::Error;

/// Errors that can occur when interacting with the kernel
///
/// Every variant is recoverable from the kernel's point of view: a failed
/// request leaves the scheduler in a consistent state and other tasks
/// unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RtosError {
    /// Task or stack storage exhausted
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// Task handle refers to a deleted or never-created task
    #[error("Invalid task handle: {0}")]
    InvalidTaskHandle(TaskId),

    /// Lock handle refers to a never-created lock
    #[error("Invalid lock handle: {0}")]
    InvalidLockHandle(LockId),

    /// A bounded wait elapsed without the resource becoming available
    #[error("Timeout expired")]
    TimeoutExpired,

    /// A mutex was released by a task that does not hold it
    #[error("{task} does not hold {lock}")]
    NotLockHolder { lock: LockId, task: TaskId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RtosError::AllocationFailure("stack pool exhausted".to_string());
        assert_eq!(format!("{}", err), "Allocation failure: stack pool exhausted");

        let err = RtosError::InvalidTaskHandle(TaskId::from_raw(9));
        assert_eq!(format!("{}", err), "Invalid task handle: task:9");

        let err = RtosError::NotLockHolder {
            lock: LockId::from_raw(1),
            task: TaskId::from_raw(2),
        };
        assert_eq!(format!("{}", err), "task:2 does not hold lock:1");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(RtosError::TimeoutExpired, RtosError::TimeoutExpired);
        assert_ne!(
            RtosError::InvalidTaskHandle(TaskId::from_raw(1)),
            RtosError::InvalidTaskHandle(TaskId::from_raw(2))
        );
    }
}
