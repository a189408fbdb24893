//! Task-plane syscall vocabulary
//!
//! Task code does not call kernel methods directly. A task is a *behavior*
//! closure that the kernel polls whenever the task holds the CPU and has
//! nothing left to execute; the closure returns the next [`Syscall`] and
//! the kernel carries it out. The result of the previous syscall arrives
//! through the [`TaskContext`] on the next poll.
//!
//! This keeps task bodies free of kernel references (no aliasing of the
//! kernel inside the tasks it is running) and makes every interaction
//! between a task and the scheduler an explicit, loggable step.

use crate::RtosError;
use rtos_types::{LockId, Ticks};
use serde::{Deserialize, Serialize};

/// Requests a task can issue to the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Syscall {
    /// Consume `cycles` cycles of simulated CPU
    ///
    /// The task stays Running (subject to preemption) until the cycles
    /// are spent, then is polled again.
    Busy { cycles: u64 },
    /// Acquire a lock, waiting up to `timeout` ticks
    ///
    /// `Ticks::ZERO` is a try-acquire that never blocks;
    /// `Ticks::FOREVER` waits indefinitely.
    Take { lock: LockId, timeout: Ticks },
    /// Release a lock
    Give { lock: LockId },
    /// Block for the given number of ticks
    ///
    /// A zero-tick delay degenerates to `Yield`.
    Delay { ticks: Ticks },
    /// Give up the CPU to the tail of the caller's ready queue
    Yield,
    /// Delete the calling task
    Exit,
}

/// How the previous syscall ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// The request took effect
    Completed,
    /// A bounded `Take` elapsed without acquiring the lock
    TimedOut,
    /// The kernel refused the request; scheduling state is unchanged
    Rejected(RtosError),
}

impl SyscallOutcome {
    /// Converts the outcome into a `Result`, mapping an elapsed `Take`
    /// timeout onto [`RtosError::TimeoutExpired`]
    pub fn into_result(self) -> Result<(), RtosError> {
        match self {
            SyscallOutcome::Completed => Ok(()),
            SyscallOutcome::TimedOut => Err(RtosError::TimeoutExpired),
            SyscallOutcome::Rejected(err) => Err(err),
        }
    }
}

/// Read-only view handed to a behavior when it is polled
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Current tick count
    pub now_tick: u64,
    /// Cycles this task has spent Running so far
    pub runtime_cycles: u64,
    /// Result of the task's previous syscall (`Completed` on first poll)
    pub last_outcome: SyscallOutcome,
}

/// A task body
///
/// Polled by the kernel for the next syscall whenever the task is Running
/// with nothing pending. State lives in the closure's captures, which
/// stands in for the task's registers and locals.
pub type TaskBehavior = Box<dyn FnMut(&TaskContext) -> Syscall>;
