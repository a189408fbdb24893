//! Lock primitives and their wait queues
//!
//! Two flavors share one structure: the priority-inheriting mutex and the
//! plain binary semaphore. The flavor only changes what the kernel does
//! around contention (boost or not) and who may release (owner or anyone);
//! ownership tracking and wait-queue ordering are identical.

use rtos_types::{Priority, TaskId};
use std::collections::VecDeque;

/// One waiter in a lock's wait queue
///
/// Carries the waiter's effective priority as of the last insertion or
/// reposition, which is what the queue is ordered by. The kernel keeps it
/// in sync whenever inheritance changes a blocked task's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Waiter {
    pub task: TaskId,
    pub priority: Priority,
}

/// Wait queue ordered by priority, FIFO among equals
///
/// The front is always the waiter to grant next. Insertion places a new
/// waiter behind existing waiters of the same priority, so equal-priority
/// contenders are served in arrival order.
#[derive(Debug, Clone, Default)]
pub(crate) struct WaitQueue {
    waiters: VecDeque<Waiter>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self {
            waiters: VecDeque::new(),
        }
    }

    /// Inserts a waiter before the first strictly lower priority
    pub fn insert(&mut self, task: TaskId, priority: Priority) {
        let pos = self
            .waiters
            .iter()
            .position(|w| w.priority < priority)
            .unwrap_or(self.waiters.len());
        self.waiters.insert(pos, Waiter { task, priority });
    }

    /// Removes and returns the waiter to grant next
    pub fn pop_front(&mut self) -> Option<Waiter> {
        self.waiters.pop_front()
    }

    /// Removes a waiter wherever it sits
    ///
    /// Returns whether it was present.
    pub fn remove(&mut self, task: TaskId) -> bool {
        let before = self.waiters.len();
        self.waiters.retain(|w| w.task != task);
        self.waiters.len() != before
    }

    /// Moves a waiter to the position its new priority demands
    ///
    /// The waiter re-enters behind existing waiters of the new priority,
    /// the same placement a fresh arrival would get.
    pub fn reposition(&mut self, task: TaskId, new_priority: Priority) {
        if self.remove(task) {
            self.insert(task, new_priority);
        }
    }

    /// Priority of the waiter at the front
    pub fn front_priority(&self) -> Option<Priority> {
        self.waiters.front().map(|w| w.priority)
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    #[cfg(test)]
    pub fn order(&self) -> Vec<TaskId> {
        self.waiters.iter().map(|w| w.task).collect()
    }
}

/// Lock state tracked by the kernel
///
/// Both flavors track the owner so that task deletion can release held
/// locks; a free lock has no owner. Locks start free.
#[derive(Debug, Clone)]
pub(crate) struct Lock {
    /// Whether contention boosts the owner (mutex) or not (semaphore)
    pub inherits_priority: bool,
    pub owner: Option<TaskId>,
    pub waiters: WaitQueue,
}

impl Lock {
    pub fn new(inherits_priority: bool) -> Self {
        Self {
            inherits_priority,
            owner: None,
            waiters: WaitQueue::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: u64) -> TaskId {
        TaskId::from_raw(raw)
    }

    #[test]
    fn test_insert_orders_by_priority() {
        let mut queue = WaitQueue::new();
        queue.insert(t(1), Priority::new(1));
        queue.insert(t(2), Priority::new(5));
        queue.insert(t(3), Priority::new(3));

        assert_eq!(queue.order(), vec![t(2), t(3), t(1)]);
        assert_eq!(queue.front_priority(), Some(Priority::new(5)));
    }

    #[test]
    fn test_fifo_among_equal_priorities() {
        let mut queue = WaitQueue::new();
        queue.insert(t(1), Priority::new(3));
        queue.insert(t(2), Priority::new(3));
        queue.insert(t(3), Priority::new(3));

        assert_eq!(queue.order(), vec![t(1), t(2), t(3)]);
        assert_eq!(queue.pop_front().map(|w| w.task), Some(t(1)));
        assert_eq!(queue.pop_front().map(|w| w.task), Some(t(2)));
    }

    #[test]
    fn test_equal_priority_inserts_behind_peers() {
        let mut queue = WaitQueue::new();
        queue.insert(t(1), Priority::new(4));
        queue.insert(t(2), Priority::new(2));
        queue.insert(t(3), Priority::new(4));

        assert_eq!(queue.order(), vec![t(1), t(3), t(2)]);
    }

    #[test]
    fn test_remove() {
        let mut queue = WaitQueue::new();
        queue.insert(t(1), Priority::new(2));
        queue.insert(t(2), Priority::new(2));

        assert!(queue.remove(t(1)));
        assert!(!queue.remove(t(1)));
        assert_eq!(queue.order(), vec![t(2)]);
    }

    #[test]
    fn test_reposition_on_boost() {
        let mut queue = WaitQueue::new();
        queue.insert(t(1), Priority::new(5));
        queue.insert(t(2), Priority::new(2));
        queue.insert(t(3), Priority::new(1));

        // t(3) gets boosted to 5: behind the existing 5, ahead of the 2.
        queue.reposition(t(3), Priority::new(5));
        assert_eq!(queue.order(), vec![t(1), t(3), t(2)]);
    }

    #[test]
    fn test_new_lock_is_free() {
        let lock = Lock::new(true);
        assert!(lock.inherits_priority);
        assert_eq!(lock.owner, None);
        assert!(lock.waiters.is_empty());
    }
}
