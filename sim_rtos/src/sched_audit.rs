//! Scheduling Audit Log
//!
//! Records scheduling and locking decisions for test verification and
//! debugging. This is NOT for production observability - it's for proving
//! scheduler correctness: tests assert that inversion scenarios produce
//! the boosts and restores they should, not just the right counters.

use rtos_types::{LockId, Priority, TaskId};
use serde::{Deserialize, Serialize};

/// Why a task lost the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreemptReason {
    /// A strictly higher-priority task became Ready
    HigherPriorityReady,
    /// Time slice used up with an equal-priority peer waiting
    TimeSliceExpired,
    /// Task yielded voluntarily
    Yielded,
    /// Task blocked on a contended lock
    Blocked,
}

/// One scheduling or locking event, stamped with the tick it happened on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedEvent {
    /// Task entered the system Ready
    TaskCreated {
        task: TaskId,
        priority: Priority,
        tick: u64,
    },
    /// Task was given the CPU
    TaskDispatched { task: TaskId, tick: u64 },
    /// Task lost the CPU
    TaskPreempted {
        task: TaskId,
        reason: PreemptReason,
        tick: u64,
    },
    /// Task blocked on a delay until `wake_tick`
    TaskDelayed {
        task: TaskId,
        wake_tick: u64,
        tick: u64,
    },
    /// Blocked task became Ready again
    TaskWoken { task: TaskId, tick: u64 },
    /// Task handle was invalidated
    TaskDeleted { task: TaskId, tick: u64 },
    /// Free lock acquired without waiting
    LockAcquired {
        lock: LockId,
        task: TaskId,
        tick: u64,
    },
    /// Holder released a lock
    LockReleased {
        lock: LockId,
        task: TaskId,
        tick: u64,
    },
    /// Released lock handed to its top waiter
    LockGranted {
        lock: LockId,
        task: TaskId,
        tick: u64,
    },
    /// Bounded take elapsed without the lock
    TakeTimedOut {
        lock: LockId,
        task: TaskId,
        tick: u64,
    },
    /// Owner boosted above its base by a waiter's demand
    PriorityInherited {
        task: TaskId,
        from: Priority,
        to: Priority,
        tick: u64,
    },
    /// Boost dropped back toward base
    PriorityRestored {
        task: TaskId,
        from: Priority,
        to: Priority,
        tick: u64,
    },
}

/// Scheduling audit log for testing
///
/// Records every scheduling transition made during execution. Used to
/// verify scheduler behavior in tests.
#[derive(Debug, Clone)]
pub struct SchedAuditLog {
    events: Vec<SchedEvent>,
}

impl SchedAuditLog {
    /// Creates a new empty audit log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Records an event
    pub fn record(&mut self, event: SchedEvent) {
        self.events.push(event);
    }

    /// Returns all recorded events
    pub fn events(&self) -> &[SchedEvent] {
        &self.events
    }

    /// Clears all recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns events matching a predicate
    pub fn find_events<F>(&self, predicate: F) -> Vec<&SchedEvent>
    where
        F: Fn(&SchedEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).collect()
    }

    /// Checks if any event matches a predicate
    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&SchedEvent) -> bool,
    {
        self.events.iter().any(predicate)
    }

    /// Counts events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SchedEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl Default for SchedAuditLog {
    fn default() -> Self {
        Self::new()
    }
}
