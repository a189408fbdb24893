//! Task state and status snapshots

use rtos_types::Priority;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Scheduling state of a task
///
/// The numeric encoding is a wire contract shared with external tooling:
/// Running = 0, Ready = 1, Blocked = 2. These values are stable and must
/// never be reordered. `Deleted` exists so the kernel can mark a handle
/// dead internally; it is never observable through a status snapshot
/// (status queries on deleted tasks fail with `InvalidTaskHandle`
/// instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskState {
    /// Holds the CPU right now. Exactly one task is Running at any
    /// instant.
    Running = 0,
    /// Eligible to run, waiting in a ready queue.
    Ready = 1,
    /// Waiting on a lock or a delay; not eligible to run.
    Blocked = 2,
    /// Handle has been invalidated. Internal bookkeeping only.
    Deleted = 3,
}

impl TaskState {
    /// Returns the wire encoding
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes the wire encoding
    pub const fn from_u8(raw: u8) -> Option<TaskState> {
        match raw {
            0 => Some(TaskState::Running),
            1 => Some(TaskState::Ready),
            2 => Some(TaskState::Blocked),
            3 => Some(TaskState::Deleted),
            _ => None,
        }
    }
}

// Serialized as the bare integer so external assertions observe the
// numeric contract, not a variant name.
impl Serialize for TaskState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for TaskState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        TaskState::from_u8(raw)
            .ok_or_else(|| D::Error::custom(format!("invalid task state encoding: {}", raw)))
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Running => "Running",
            TaskState::Ready => "Ready",
            TaskState::Blocked => "Blocked",
            TaskState::Deleted => "Deleted",
        };
        write!(f, "{}", name)
    }
}

/// Point-in-time snapshot of one task
///
/// Returned by status queries as an owned copy; it never references
/// kernel state and stays valid after further scheduling. `runtime_cycles`
/// reflects every cycle attributed up to the moment of the query,
/// including a partially elapsed tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Scheduling state at the moment of the query
    pub state: TaskState,
    /// Human-readable task name
    pub name: String,
    /// Priority the task was created with
    pub base_priority: Priority,
    /// Current priority including any inherited boost
    pub effective_priority: Priority,
    /// Cycles spent Running since creation; monotonically non-decreasing
    pub runtime_cycles: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_encoding() {
        assert_eq!(TaskState::Running.as_u8(), 0);
        assert_eq!(TaskState::Ready.as_u8(), 1);
        assert_eq!(TaskState::Blocked.as_u8(), 2);
        assert_eq!(TaskState::Deleted.as_u8(), 3);
    }

    #[test]
    fn test_state_decoding() {
        assert_eq!(TaskState::from_u8(0), Some(TaskState::Running));
        assert_eq!(TaskState::from_u8(2), Some(TaskState::Blocked));
        assert_eq!(TaskState::from_u8(4), None);
    }

    #[test]
    fn test_state_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&TaskState::Running).unwrap(), "0");
        assert_eq!(serde_json::to_string(&TaskState::Ready).unwrap(), "1");
        assert_eq!(serde_json::to_string(&TaskState::Blocked).unwrap(), "2");
    }

    #[test]
    fn test_state_deserializes_from_integer() {
        let state: TaskState = serde_json::from_str("2").unwrap();
        assert_eq!(state, TaskState::Blocked);
        assert!(serde_json::from_str::<TaskState>("7").is_err());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", TaskState::Running), "Running");
        assert_eq!(format!("{}", TaskState::Blocked), "Blocked");
    }

    #[test]
    fn test_status_round_trip() {
        let status = TaskStatus {
            state: TaskState::Ready,
            name: "worker".to_string(),
            base_priority: Priority::new(1),
            effective_priority: Priority::new(5),
            runtime_cycles: 1234,
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
        // The state field rides the wire as its numeric encoding.
        assert!(json.contains("\"state\":1"));
    }
}
