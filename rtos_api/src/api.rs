//! Kernel API trait and task creation types

use crate::{RtosError, TaskBehavior, TaskStatus};
use rtos_types::{LockId, Priority, TaskId};
use serde::{Deserialize, Serialize};

/// Descriptor for creating a new task
///
/// Task creation is explicit construction, not duplication: the caller
/// names the task, fixes its priority, and sizes its stack. The workload
/// itself (the behavior closure) is passed separately because it is not
/// serializable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Human-readable name, reported in status snapshots
    pub name: String,
    /// Fixed base priority
    pub priority: Priority,
    /// Stack bytes to reserve from the kernel's stack pool
    pub stack_bytes: usize,
}

impl TaskSpec {
    /// Default stack reservation for tasks that don't specify one
    pub const DEFAULT_STACK_BYTES: usize = 1024;

    /// Creates a task spec with the default stack size
    pub fn new(name: String, priority: Priority) -> Self {
        Self {
            name,
            priority,
            stack_bytes: Self::DEFAULT_STACK_BYTES,
        }
    }

    /// Overrides the stack reservation
    pub fn with_stack_bytes(mut self, stack_bytes: usize) -> Self {
        self.stack_bytes = stack_bytes;
        self
    }
}

/// The scheduler kernel API
///
/// This defines the harness-facing interface of the kernel. Multiple
/// implementations are possible: the simulated kernel (for testing and
/// demos) is the canonical one.
///
/// # Design Principles
///
/// **Explicit time**: Nothing happens between calls. Ticks elapse only
/// through [`tick`](RtosApi::tick) (or the simulation's finer-grained
/// cycle advancement).
///
/// **Synchronous rescheduling**: Every operation that can change which
/// task should run re-evaluates dispatch before returning. Preemption is
/// never deferred to the next tick.
///
/// **Copy-out status**: Queries return owned snapshots, never references
/// into kernel state.
pub trait RtosApi {
    /// Creates a task and makes it Ready
    ///
    /// The requested priority is clamped to the kernel's top configured
    /// level. If the new task outranks the current one it is dispatched
    /// before this call returns.
    ///
    /// # Errors
    ///
    /// [`RtosError::AllocationFailure`] when the stack pool or the task
    /// cap is exhausted.
    fn create_task(&mut self, spec: TaskSpec, behavior: TaskBehavior) -> Result<TaskId, RtosError>;

    /// Deletes a task and invalidates its handle
    ///
    /// Locks held by the task are released as if it had given them, with
    /// the same ownership-handoff and priority-restore behavior. If the
    /// task was Running, the next task is dispatched before this call
    /// returns.
    ///
    /// # Errors
    ///
    /// [`RtosError::InvalidTaskHandle`] if the handle was already deleted
    /// or never existed.
    ///
    /// # Panics
    ///
    /// Deleting the built-in idle task is harness misuse and panics.
    fn delete_task(&mut self, task: TaskId) -> Result<(), RtosError>;

    /// Creates a lock
    ///
    /// `inherits_priority` selects the flavor: `true` for a
    /// priority-inheriting mutex, `false` for a plain binary semaphore.
    /// Both flavors start free.
    ///
    /// # Errors
    ///
    /// [`RtosError::AllocationFailure`] when lock storage is exhausted.
    fn create_lock(&mut self, inherits_priority: bool) -> Result<LockId, RtosError>;

    /// Advances simulated time to the next tick boundary
    ///
    /// Tick-boundary work runs in a fixed order: expired delays and take
    /// timeouts wake first, then time-slice rotation among equal-priority
    /// tasks, then dispatch re-evaluation.
    fn tick(&mut self);

    /// Returns a point-in-time snapshot of a task
    ///
    /// # Errors
    ///
    /// [`RtosError::InvalidTaskHandle`] for deleted or unknown handles;
    /// a deleted task's accounting is unreachable.
    fn get_task_status(&self, task: TaskId) -> Result<TaskStatus, RtosError>;

    /// Returns the current tick count
    fn current_tick(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_spec_defaults() {
        let spec = TaskSpec::new("worker".to_string(), Priority::new(3));
        assert_eq!(spec.name, "worker");
        assert_eq!(spec.priority, Priority::new(3));
        assert_eq!(spec.stack_bytes, TaskSpec::DEFAULT_STACK_BYTES);
    }

    #[test]
    fn test_task_spec_stack_override() {
        let spec = TaskSpec::new("big".to_string(), Priority::new(1)).with_stack_bytes(8192);
        assert_eq!(spec.stack_bytes, 8192);
    }

    #[test]
    fn test_task_spec_round_trip() {
        let spec = TaskSpec::new("serialized".to_string(), Priority::new(2)).with_stack_bytes(512);
        let json = serde_json::to_string(&spec).unwrap();
        let back: TaskSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
