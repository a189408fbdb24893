//! Per-priority ready queues
//!
//! One FIFO ring per priority level, using `VecDeque` for deterministic
//! ordering. Every transition to Ready appends at the tail of the task's
//! effective-priority queue, so equal-priority tasks are served in the
//! order they last became Ready. The Running task sits in no queue.

use rtos_types::{Priority, TaskId};
use std::collections::VecDeque;

/// The set of ready queues, indexed by priority level
#[derive(Debug, Clone)]
pub(crate) struct ReadyQueueSet {
    queues: Vec<VecDeque<TaskId>>,
}

impl ReadyQueueSet {
    /// Creates empty queues for `levels` priority levels (0 .. levels)
    pub fn new(levels: usize) -> Self {
        assert!(levels > 0, "at least one priority level required");
        Self {
            queues: (0..levels).map(|_| VecDeque::new()).collect(),
        }
    }

    /// Appends a task at the tail of its priority level
    ///
    /// # Panics
    ///
    /// Panics if the priority exceeds the configured level count; the
    /// kernel clamps priorities at task creation, so this is a kernel bug.
    pub fn push_tail(&mut self, task: TaskId, priority: Priority) {
        self.queues[priority.level() as usize].push_back(task);
    }

    /// Removes and returns the head of the highest non-empty level
    pub fn pop_highest(&mut self) -> Option<TaskId> {
        for queue in self.queues.iter_mut().rev() {
            if let Some(task) = queue.pop_front() {
                return Some(task);
            }
        }
        None
    }

    /// Returns the highest level that has a ready task
    pub fn highest_level(&self) -> Option<Priority> {
        for (level, queue) in self.queues.iter().enumerate().rev() {
            if !queue.is_empty() {
                return Some(Priority::new(level as u8));
            }
        }
        None
    }

    /// Removes a task from the given level's queue
    ///
    /// Returns whether the task was present. Position keyed by effective
    /// priority: callers must pass the priority the task was enqueued
    /// under.
    pub fn remove(&mut self, task: TaskId, priority: Priority) -> bool {
        let queue = &mut self.queues[priority.level() as usize];
        let before = queue.len();
        queue.retain(|&id| id != task);
        queue.len() != before
    }

    /// Number of ready tasks at one level
    pub fn level_len(&self, priority: Priority) -> usize {
        self.queues[priority.level() as usize].len()
    }

    /// Total number of ready tasks
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queues.iter().map(|q| q.len()).sum()
    }

    /// Whether a task is queued at the given level
    #[cfg(test)]
    pub fn contains(&self, task: TaskId, priority: Priority) -> bool {
        self.queues[priority.level() as usize].contains(&task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: u64) -> TaskId {
        TaskId::from_raw(raw)
    }

    #[test]
    fn test_empty_set() {
        let mut set = ReadyQueueSet::new(8);
        assert_eq!(set.len(), 0);
        assert_eq!(set.pop_highest(), None);
        assert_eq!(set.highest_level(), None);
    }

    #[test]
    fn test_pop_highest_prefers_higher_level() {
        let mut set = ReadyQueueSet::new(8);
        set.push_tail(t(1), Priority::new(1));
        set.push_tail(t(2), Priority::new(5));
        set.push_tail(t(3), Priority::new(3));

        assert_eq!(set.highest_level(), Some(Priority::new(5)));
        assert_eq!(set.pop_highest(), Some(t(2)));
        assert_eq!(set.pop_highest(), Some(t(3)));
        assert_eq!(set.pop_highest(), Some(t(1)));
        assert_eq!(set.pop_highest(), None);
    }

    #[test]
    fn test_fifo_within_level() {
        let mut set = ReadyQueueSet::new(4);
        set.push_tail(t(1), Priority::new(2));
        set.push_tail(t(2), Priority::new(2));
        set.push_tail(t(3), Priority::new(2));

        assert_eq!(set.pop_highest(), Some(t(1)));
        // Requeued task goes to the tail, behind its peers.
        set.push_tail(t(1), Priority::new(2));
        assert_eq!(set.pop_highest(), Some(t(2)));
        assert_eq!(set.pop_highest(), Some(t(3)));
        assert_eq!(set.pop_highest(), Some(t(1)));
    }

    #[test]
    fn test_remove() {
        let mut set = ReadyQueueSet::new(4);
        set.push_tail(t(1), Priority::new(1));
        set.push_tail(t(2), Priority::new(1));

        assert!(set.remove(t(1), Priority::new(1)));
        assert!(!set.remove(t(1), Priority::new(1)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.pop_highest(), Some(t(2)));
    }

    #[test]
    fn test_level_len() {
        let mut set = ReadyQueueSet::new(4);
        set.push_tail(t(1), Priority::new(3));
        set.push_tail(t(2), Priority::new(3));
        set.push_tail(t(3), Priority::new(0));

        assert_eq!(set.level_len(Priority::new(3)), 2);
        assert_eq!(set.level_len(Priority::new(0)), 1);
        assert_eq!(set.level_len(Priority::new(1)), 0);
    }
}
