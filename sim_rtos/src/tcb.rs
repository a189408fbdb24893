//! Task control blocks
//!
//! One `Tcb` per task, owned exclusively by the kernel and reachable only
//! through its handle. State transitions:
//!
//! ```text
//!            create             dispatch
//!   (new) ---------> Ready <--------------> Running
//!                      ^    preempt/yield      |
//!                      |                       | contended take,
//!                      | wake / grant /        | delay
//!                      | timeout               v
//!                      +------------------- Blocked
//! ```
//!
//! Deletion can strike any state; the entry stays in the task table as a
//! `Deleted` tombstone so the handle is recognized as stale rather than
//! unknown.

use rtos_api::{Syscall, SyscallOutcome, TaskBehavior, TaskState};
use rtos_types::{LockId, Priority};

/// Task control block
pub(crate) struct Tcb {
    /// Human-readable name, reported in status snapshots
    pub name: String,
    /// Priority the task was created with; never changes
    pub base_priority: Priority,
    /// Current priority including any inherited boost; never below base
    pub effective_priority: Priority,
    pub state: TaskState,
    /// Simulated stack reservation, returned to the pool on deletion
    stack: Vec<u8>,
    /// The task's workload; polled for the next syscall while Running
    pub behavior: TaskBehavior,
    /// Cycles spent Running since creation
    pub runtime_cycles: u64,
    /// Cycles left in the current `Busy` syscall
    pub busy_remaining: u64,
    /// Locks held, in acquisition order
    pub owned_locks: Vec<LockId>,
    /// Lock being waited on, when Blocked on a take
    pub blocked_on: Option<LockId>,
    /// Tick at which a delay expires, when Blocked on a delay
    pub wake_at_tick: Option<u64>,
    /// Tick at which a bounded take gives up, when Blocked on a take
    pub timeout_at_tick: Option<u64>,
    /// Result of the previous syscall, delivered on the next poll
    pub last_outcome: SyscallOutcome,
    /// Ticks consumed from the current time slice
    pub slice_ticks_used: u64,
}

impl Tcb {
    /// Creates a Ready task with no inherited boost
    pub fn new(
        name: String,
        priority: Priority,
        stack_bytes: usize,
        behavior: TaskBehavior,
    ) -> Self {
        Self {
            name,
            base_priority: priority,
            effective_priority: priority,
            state: TaskState::Ready,
            stack: vec![0; stack_bytes],
            behavior,
            runtime_cycles: 0,
            busy_remaining: 0,
            owned_locks: Vec::new(),
            blocked_on: None,
            wake_at_tick: None,
            timeout_at_tick: None,
            last_outcome: SyscallOutcome::Completed,
            slice_ticks_used: 0,
        }
    }

    /// Returns the stack reservation size
    #[cfg(test)]
    pub fn stack_bytes(&self) -> usize {
        self.stack.len()
    }

    /// Releases the stack reservation and the behavior's captures
    ///
    /// Called once, at deletion. Returns the number of stack bytes handed
    /// back to the pool.
    pub fn release_resources(&mut self) -> usize {
        let released = self.stack.len();
        self.stack = Vec::new();
        self.behavior = Box::new(|_| Syscall::Exit);
        released
    }
}
