//! Fixed-Priority Preemptive Scheduler Kernel
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same tasks + same advancement calls => same
//!   schedule, same counters, same audit trail.
//! - **No hidden yields**: The CPU changes hands only through explicit,
//!   logged transitions.
//! - **Synchronous rescheduling**: Dispatch is re-evaluated at every event
//!   that can change the top Ready priority, never deferred to the next
//!   tick.
//! - **Correctness over performance**: Queue scans are linear; the
//!   simulation optimizes for being provably right, not fast.
//!
//! ## Design
//!
//! - **Fixed priorities**: Highest effective priority runs; ties FIFO by
//!   last-became-Ready; an equal-priority arrival never preempts.
//! - **Time-sliced equals**: At tick boundaries the Running task rotates
//!   to the tail of its level when a peer waits there.
//! - **Priority inheritance**: A mutex boosts its holder to the top
//!   waiter's effective priority, transitively along blocked-on chains;
//!   a semaphore never does, which is how unbounded inversion is
//!   reproduced on demand.
//! - **Single critical section**: All state lives behind `&mut self`, so
//!   a release and a timeout expiry can never interleave.

use crate::clock::SimClock;
use crate::locks::Lock;
use crate::ready_queue::ReadyQueueSet;
use crate::sched_audit::{PreemptReason, SchedAuditLog, SchedEvent};
use crate::tcb::Tcb;
use crate::workload;
use rtos_api::{
    RtosApi, RtosError, Syscall, SyscallOutcome, TaskBehavior, TaskContext, TaskSpec, TaskState,
    TaskStatus,
};
use rtos_types::{LockId, Priority, TaskId, Ticks};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kernel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Cycles that make up one scheduler tick
    pub cycles_per_tick: u64,
    /// Ticks a task may run before rotating behind an equal-priority peer
    pub time_slice_ticks: u64,
    /// Number of priority levels (valid levels are 0 .. levels - 1);
    /// requested priorities are clamped to the top level
    pub max_priority_levels: u8,
    /// Bytes available for task stack reservations
    pub stack_pool_bytes: usize,
    /// Maximum number of live tasks, including the idle task (None = no cap)
    pub max_tasks: Option<usize>,
    /// Consecutive zero-cycle syscalls a task may issue before the kernel
    /// treats it as runaway and panics
    pub max_immediate_syscalls: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            cycles_per_tick: 1000,
            time_slice_ticks: 1,
            max_priority_levels: 16,
            stack_pool_bytes: 128 * 1024,
            max_tasks: None,
            max_immediate_syscalls: 256,
        }
    }
}

/// The simulated RTOS kernel
///
/// Owns every task control block and lock, and is the only place
/// scheduling state changes. All state is directly accessible for
/// testing through the accessor methods and the audit log.
pub struct SimulatedRtos {
    config: KernelConfig,
    clock: SimClock,
    /// Task table; deleted tasks stay as tombstones so stale handles are
    /// recognized. BTreeMap keeps wake passes deterministic.
    tasks: BTreeMap<TaskId, Tcb>,
    locks: BTreeMap<LockId, Lock>,
    ready: ReadyQueueSet,
    /// The Running task. Always valid: the idle task when nothing else is.
    current: TaskId,
    next_task_raw: u64,
    next_lock_raw: u64,
    stack_bytes_free: usize,
    /// Audit log for scheduling events (test-only)
    audit: SchedAuditLog,
}

impl SimulatedRtos {
    /// Handle of the built-in idle task
    pub const IDLE_TASK: TaskId = TaskId::from_raw(0);

    /// Creates a kernel with default configuration
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    /// Creates a kernel with custom configuration
    ///
    /// The idle task occupies handle 0 and the Running slot from the
    /// start; it reserves no stack from the pool.
    ///
    /// # Panics
    ///
    /// Panics if `cycles_per_tick`, `time_slice_ticks` or
    /// `max_priority_levels` is zero.
    pub fn with_config(config: KernelConfig) -> Self {
        assert!(config.time_slice_ticks > 0, "time_slice_ticks must be nonzero");
        assert!(
            config.max_priority_levels > 0,
            "max_priority_levels must be nonzero"
        );
        let clock = SimClock::new(config.cycles_per_tick);
        let ready = ReadyQueueSet::new(config.max_priority_levels as usize);
        let stack_bytes_free = config.stack_pool_bytes;
        let mut kernel = Self {
            config,
            clock,
            tasks: BTreeMap::new(),
            locks: BTreeMap::new(),
            ready,
            current: Self::IDLE_TASK,
            next_task_raw: 1,
            next_lock_raw: 0,
            stack_bytes_free,
            audit: SchedAuditLog::new(),
        };

        let mut idle = Tcb::new("IDLE".to_string(), Priority::IDLE, 0, workload::idle_spin());
        idle.state = TaskState::Running;
        kernel.tasks.insert(Self::IDLE_TASK, idle);
        kernel.audit.record(SchedEvent::TaskCreated {
            task: Self::IDLE_TASK,
            priority: Priority::IDLE,
            tick: 0,
        });
        kernel.audit.record(SchedEvent::TaskDispatched {
            task: Self::IDLE_TASK,
            tick: 0,
        });
        kernel
    }

    /// Advances simulated time by the given number of cycles
    ///
    /// Cycles are attributed to whichever task is Running while they
    /// elapse; syscalls are processed the moment the Running task has no
    /// cycles left to burn, so dispatch changes take effect mid-tick.
    /// Tick-boundary work runs each time the clock crosses a tick
    /// multiple.
    pub fn advance_cycles(&mut self, cycles: u64) {
        let mut remaining = cycles;
        while remaining > 0 {
            self.ensure_current_has_work();
            let current = self.current;
            let burn = {
                let tcb = &self.tasks[&current];
                remaining
                    .min(tcb.busy_remaining)
                    .min(self.clock.cycles_until_next_tick())
            };
            self.clock.advance_cycles(burn);
            {
                let tcb = self.tasks.get_mut(&current).expect("current task missing");
                tcb.runtime_cycles += burn;
                tcb.busy_remaining -= burn;
            }
            remaining -= burn;
            if self.clock.is_on_tick_boundary() {
                self.process_tick_boundary();
            }
        }
    }

    /// Returns the Running task's handle
    pub fn current_task(&self) -> TaskId {
        self.current
    }

    /// Returns the number of live tasks, including the idle task
    pub fn task_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|t| t.state != TaskState::Deleted)
            .count()
    }

    /// Returns the number of locks ever created
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Returns a lock's owner, or None when the lock is free or unknown
    pub fn lock_owner(&self, lock: LockId) -> Option<TaskId> {
        self.locks.get(&lock).and_then(|l| l.owner)
    }

    /// Returns the number of tasks waiting on a lock
    pub fn waiter_count(&self, lock: LockId) -> usize {
        self.locks.get(&lock).map_or(0, |l| l.waiters.len())
    }

    /// Returns the unreserved bytes left in the stack pool
    pub fn stack_bytes_free(&self) -> usize {
        self.stack_bytes_free
    }

    /// Returns cycles elapsed since construction
    pub fn current_cycle(&self) -> u64 {
        self.clock.current_cycles()
    }

    /// Returns the kernel configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Returns the scheduling audit log
    pub fn audit(&self) -> &SchedAuditLog {
        &self.audit
    }

    /// Clears the scheduling audit log
    pub fn clear_audit(&mut self) {
        self.audit.clear();
    }

    fn clamp_priority(&self, requested: Priority) -> Priority {
        requested.min(Priority::new(self.config.max_priority_levels - 1))
    }

    /// Polls the Running task's behavior until it has cycles to burn
    ///
    /// Each syscall is applied synchronously; blocking or exiting syscalls
    /// dispatch a new Running task and the loop continues with it. A task
    /// that keeps issuing zero-cycle syscalls trips the runaway guard.
    fn ensure_current_has_work(&mut self) {
        let mut polls: u32 = 0;
        let mut last = self.current;
        loop {
            let current = self.current;
            if current != last {
                polls = 0;
                last = current;
            }
            if self.tasks[&current].busy_remaining > 0 {
                return;
            }
            polls += 1;
            if polls > self.config.max_immediate_syscalls {
                panic!(
                    "{} issued {} consecutive syscalls without consuming cycles; runaway behavior",
                    current, polls
                );
            }
            let ctx = {
                let tcb = &self.tasks[&current];
                TaskContext {
                    now_tick: self.clock.current_tick(),
                    runtime_cycles: tcb.runtime_cycles,
                    last_outcome: tcb.last_outcome.clone(),
                }
            };
            let call = {
                let tcb = self.tasks.get_mut(&current).expect("current task missing");
                (tcb.behavior)(&ctx)
            };
            self.apply_syscall(current, call);
        }
    }

    fn apply_syscall(&mut self, caller: TaskId, call: Syscall) {
        match call {
            Syscall::Busy { cycles } => {
                let tcb = self.tasks.get_mut(&caller).expect("current task missing");
                tcb.busy_remaining = cycles;
                tcb.last_outcome = SyscallOutcome::Completed;
            }
            Syscall::Yield => self.yield_current(caller),
            Syscall::Delay { ticks } => {
                if ticks.is_zero() {
                    // zero-tick delay degenerates to a yield
                    self.yield_current(caller);
                } else {
                    let now = self.clock.current_tick();
                    let wake = now.saturating_add(ticks.get());
                    {
                        let tcb = self.tasks.get_mut(&caller).expect("current task missing");
                        tcb.state = TaskState::Blocked;
                        tcb.wake_at_tick = Some(wake);
                        tcb.last_outcome = SyscallOutcome::Completed;
                    }
                    self.audit.record(SchedEvent::TaskDelayed {
                        task: caller,
                        wake_tick: wake,
                        tick: now,
                    });
                    self.dispatch_next();
                }
            }
            Syscall::Take { lock, timeout } => self.handle_take(caller, lock, timeout),
            Syscall::Give { lock } => self.handle_give(caller, lock),
            Syscall::Exit => self.remove_task(caller),
        }
    }

    fn yield_current(&mut self, caller: TaskId) {
        self.audit.record(SchedEvent::TaskPreempted {
            task: caller,
            reason: PreemptReason::Yielded,
            tick: self.clock.current_tick(),
        });
        self.tasks
            .get_mut(&caller)
            .expect("current task missing")
            .last_outcome = SyscallOutcome::Completed;
        self.make_ready(caller);
        self.dispatch_next();
    }

    fn handle_take(&mut self, caller: TaskId, lock_id: LockId, timeout: Ticks) {
        let now = self.clock.current_tick();
        let owner = match self.locks.get(&lock_id) {
            Some(lock) => lock.owner,
            None => {
                self.set_outcome(
                    caller,
                    SyscallOutcome::Rejected(RtosError::InvalidLockHandle(lock_id)),
                );
                return;
            }
        };

        let holder = match owner {
            None => {
                // free: the caller becomes owner without waiting
                self.locks.get_mut(&lock_id).expect("lock vanished").owner = Some(caller);
                let tcb = self.tasks.get_mut(&caller).expect("current task missing");
                tcb.owned_locks.push(lock_id);
                tcb.last_outcome = SyscallOutcome::Completed;
                self.audit.record(SchedEvent::LockAcquired {
                    lock: lock_id,
                    task: caller,
                    tick: now,
                });
                return;
            }
            Some(holder) => holder,
        };

        if timeout.is_zero() {
            // try-take: report failure without blocking or boosting
            self.set_outcome(caller, SyscallOutcome::TimedOut);
            self.audit.record(SchedEvent::TakeTimedOut {
                lock: lock_id,
                task: caller,
                tick: now,
            });
            return;
        }

        let caller_eff = self.tasks[&caller].effective_priority;
        self.locks
            .get_mut(&lock_id)
            .expect("lock vanished")
            .waiters
            .insert(caller, caller_eff);
        {
            let tcb = self.tasks.get_mut(&caller).expect("current task missing");
            tcb.state = TaskState::Blocked;
            tcb.blocked_on = Some(lock_id);
            tcb.timeout_at_tick = if timeout.is_forever() {
                None
            } else {
                Some(now.saturating_add(timeout.get()))
            };
        }
        self.audit.record(SchedEvent::TaskPreempted {
            task: caller,
            reason: PreemptReason::Blocked,
            tick: now,
        });

        if self.locks[&lock_id].inherits_priority {
            self.propagate_inheritance(holder);
        }
        self.dispatch_next();
    }

    fn handle_give(&mut self, caller: TaskId, lock_id: LockId) {
        let (inherits, owner) = match self.locks.get(&lock_id) {
            Some(lock) => (lock.inherits_priority, lock.owner),
            None => {
                self.set_outcome(
                    caller,
                    SyscallOutcome::Rejected(RtosError::InvalidLockHandle(lock_id)),
                );
                return;
            }
        };

        match owner {
            None if inherits => {
                self.set_outcome(
                    caller,
                    SyscallOutcome::Rejected(RtosError::NotLockHolder {
                        lock: lock_id,
                        task: caller,
                    }),
                );
            }
            None => {
                // giving a free semaphore is a no-op
                self.set_outcome(caller, SyscallOutcome::Completed);
            }
            Some(holder) if inherits && holder != caller => {
                self.set_outcome(
                    caller,
                    SyscallOutcome::Rejected(RtosError::NotLockHolder {
                        lock: lock_id,
                        task: caller,
                    }),
                );
            }
            Some(_) => {
                // a semaphore may be given by any task; a mutex only by
                // its holder (checked above)
                self.release_lock(lock_id);
                self.set_outcome(caller, SyscallOutcome::Completed);
                self.maybe_preempt();
            }
        }
    }

    /// Releases a lock held by its current owner
    ///
    /// Ownership transfers to the highest-priority waiter (FIFO among
    /// equals) and the old holder's inherited boost is recomputed from
    /// the locks it still owns. Shared by give and task deletion.
    fn release_lock(&mut self, lock_id: LockId) {
        let now = self.clock.current_tick();
        let holder = self.locks[&lock_id].owner.expect("release of a free lock");
        if let Some(tcb) = self.tasks.get_mut(&holder) {
            tcb.owned_locks.retain(|&l| l != lock_id);
        }
        self.audit.record(SchedEvent::LockReleased {
            lock: lock_id,
            task: holder,
            tick: now,
        });

        let granted = self
            .locks
            .get_mut(&lock_id)
            .expect("lock vanished")
            .waiters
            .pop_front();
        match granted {
            None => {
                self.locks.get_mut(&lock_id).expect("lock vanished").owner = None;
            }
            Some(waiter) => {
                self.locks.get_mut(&lock_id).expect("lock vanished").owner = Some(waiter.task);
                self.tasks
                    .get_mut(&waiter.task)
                    .expect("granted to unknown task")
                    .owned_locks
                    .push(lock_id);
                self.audit.record(SchedEvent::LockGranted {
                    lock: lock_id,
                    task: waiter.task,
                    tick: now,
                });
                self.wake_task(waiter.task, SyscallOutcome::Completed);
            }
        }

        // The old holder may lose a boost; the new holder may gain one
        // from the waiters still queued behind it.
        self.propagate_inheritance(holder);
        if let Some(waiter) = granted {
            self.propagate_inheritance(waiter.task);
        }
    }

    /// Recomputes effective priorities along a blocked-on chain
    ///
    /// Starts at `start` and follows lock ownership links as long as the
    /// recomputation keeps changing priorities. The visited set stops the
    /// walk on ownership cycles (deadlocked chains are left consistent).
    fn propagate_inheritance(&mut self, start: TaskId) {
        let mut visited: Vec<TaskId> = Vec::new();
        let mut cursor = Some(start);
        while let Some(task) = cursor {
            if visited.contains(&task) {
                break;
            }
            visited.push(task);
            cursor = self.recompute_effective(task);
        }
    }

    /// Recomputes one task's effective priority
    ///
    /// The rule: effective = max(base, highest waiter priority across all
    /// inheriting locks the task owns). Applies the queue repositioning a
    /// change demands and returns the next task in the chain when the
    /// changed task is itself blocked on someone else's inheriting lock.
    fn recompute_effective(&mut self, task: TaskId) -> Option<TaskId> {
        let (base, old_eff, state, blocked_on) = {
            let tcb = self.tasks.get(&task).expect("recompute on unknown task");
            if tcb.state == TaskState::Deleted {
                return None;
            }
            (
                tcb.base_priority,
                tcb.effective_priority,
                tcb.state,
                tcb.blocked_on,
            )
        };

        let mut new_eff = base;
        {
            let tcb = &self.tasks[&task];
            for lock_id in &tcb.owned_locks {
                let lock = &self.locks[lock_id];
                if !lock.inherits_priority {
                    continue;
                }
                if let Some(p) = lock.waiters.front_priority() {
                    new_eff = new_eff.max(p);
                }
            }
        }
        if new_eff == old_eff {
            return None;
        }

        let tick = self.clock.current_tick();
        if new_eff > old_eff {
            self.audit.record(SchedEvent::PriorityInherited {
                task,
                from: old_eff,
                to: new_eff,
                tick,
            });
        } else {
            self.audit.record(SchedEvent::PriorityRestored {
                task,
                from: old_eff,
                to: new_eff,
                tick,
            });
        }
        self.tasks
            .get_mut(&task)
            .expect("recompute on unknown task")
            .effective_priority = new_eff;

        match state {
            TaskState::Ready => {
                // move between ready queues; tail of the new level
                self.ready.remove(task, old_eff);
                self.ready.push_tail(task, new_eff);
            }
            TaskState::Blocked => {
                if let Some(lock_id) = blocked_on {
                    let lock = self.locks.get_mut(&lock_id).expect("blocked on unknown lock");
                    lock.waiters.reposition(task, new_eff);
                    if lock.inherits_priority {
                        if let Some(owner) = lock.owner {
                            if owner != task {
                                return Some(owner);
                            }
                        }
                    }
                }
            }
            TaskState::Running | TaskState::Deleted => {}
        }
        None
    }

    /// Moves a Blocked task back to Ready with the given syscall outcome
    fn wake_task(&mut self, task: TaskId, outcome: SyscallOutcome) {
        let now = self.clock.current_tick();
        {
            let tcb = self.tasks.get_mut(&task).expect("wake of unknown task");
            debug_assert_eq!(tcb.state, TaskState::Blocked);
            tcb.blocked_on = None;
            tcb.wake_at_tick = None;
            tcb.timeout_at_tick = None;
            tcb.last_outcome = outcome;
        }
        self.make_ready(task);
        self.audit.record(SchedEvent::TaskWoken { task, tick: now });
    }

    fn make_ready(&mut self, task: TaskId) {
        let tcb = self.tasks.get_mut(&task).expect("ready of unknown task");
        tcb.state = TaskState::Ready;
        let eff = tcb.effective_priority;
        self.ready.push_tail(task, eff);
    }

    /// Gives the CPU to the highest-priority Ready task
    ///
    /// Precondition: no task is Running (the previous holder went Ready,
    /// Blocked or Deleted first). The idle task guarantees the ready set
    /// is never empty here.
    fn dispatch_next(&mut self) {
        let next = self
            .ready
            .pop_highest()
            .expect("ready queues empty with no running task");
        let tcb = self.tasks.get_mut(&next).expect("dispatched unknown task");
        tcb.state = TaskState::Running;
        tcb.slice_ticks_used = 0;
        self.current = next;
        self.audit.record(SchedEvent::TaskDispatched {
            task: next,
            tick: self.clock.current_tick(),
        });
    }

    /// Preempts the Running task if a strictly higher Ready task exists
    fn maybe_preempt(&mut self) {
        let cur_eff = self.tasks[&self.current].effective_priority;
        let top = match self.ready.highest_level() {
            Some(p) => p,
            None => return,
        };
        if top > cur_eff {
            self.audit.record(SchedEvent::TaskPreempted {
                task: self.current,
                reason: PreemptReason::HigherPriorityReady,
                tick: self.clock.current_tick(),
            });
            self.make_ready(self.current);
            self.dispatch_next();
        }
    }

    /// Tick-boundary work: wake expirations, rotate time slices, dispatch
    fn process_tick_boundary(&mut self) {
        let now = self.clock.current_tick();

        // Collect first so the wakes don't mutate the table mid-iteration;
        // BTreeMap order keeps the pass deterministic.
        let mut delay_expired: Vec<TaskId> = Vec::new();
        let mut take_expired: Vec<(TaskId, LockId)> = Vec::new();
        for (id, tcb) in &self.tasks {
            if tcb.state != TaskState::Blocked {
                continue;
            }
            if let Some(wake_at) = tcb.wake_at_tick {
                if wake_at <= now {
                    delay_expired.push(*id);
                }
            }
            if let (Some(deadline), Some(lock_id)) = (tcb.timeout_at_tick, tcb.blocked_on) {
                if deadline <= now {
                    take_expired.push((*id, lock_id));
                }
            }
        }

        for task in delay_expired {
            self.wake_task(task, SyscallOutcome::Completed);
        }
        for (task, lock_id) in take_expired {
            self.locks
                .get_mut(&lock_id)
                .expect("timeout on unknown lock")
                .waiters
                .remove(task);
            self.audit.record(SchedEvent::TakeTimedOut {
                lock: lock_id,
                task,
                tick: now,
            });
            self.wake_task(task, SyscallOutcome::TimedOut);
            // the vanished waiter no longer demands a boost from the owner
            if let Some(owner) = self.locks[&lock_id].owner {
                self.propagate_inheritance(owner);
            }
        }

        self.rotate_time_slice();
        self.maybe_preempt();
    }

    /// Rotates the Running task behind an equal-priority peer when its
    /// time slice is used up
    fn rotate_time_slice(&mut self) {
        let cur = self.current;
        let (used, level) = {
            let tcb = self.tasks.get_mut(&cur).expect("current task missing");
            tcb.slice_ticks_used += 1;
            (tcb.slice_ticks_used, tcb.effective_priority)
        };
        if used < self.config.time_slice_ticks {
            return;
        }
        if self.ready.level_len(level) == 0 {
            // no peer to rotate to; start a fresh slice
            self.tasks
                .get_mut(&cur)
                .expect("current task missing")
                .slice_ticks_used = 0;
            return;
        }
        self.audit.record(SchedEvent::TaskPreempted {
            task: cur,
            reason: PreemptReason::TimeSliceExpired,
            tick: self.clock.current_tick(),
        });
        self.make_ready(cur);
        self.dispatch_next();
    }

    /// Removes a task: detach, tombstone, release held locks, redispatch
    ///
    /// Shared by the `Exit` syscall and `delete_task`.
    fn remove_task(&mut self, task: TaskId) {
        let was_running = self.current == task;
        let now = self.clock.current_tick();

        let (state, eff, blocked_on) = {
            let tcb = &self.tasks[&task];
            (tcb.state, tcb.effective_priority, tcb.blocked_on)
        };

        // Detach from whichever single queue holds the task, remembering
        // the lock owner whose boost may lapse with this waiter gone.
        let mut owner_to_recompute: Option<TaskId> = None;
        match state {
            TaskState::Ready => {
                self.ready.remove(task, eff);
            }
            TaskState::Blocked => {
                if let Some(lock_id) = blocked_on {
                    self.locks
                        .get_mut(&lock_id)
                        .expect("blocked on unknown lock")
                        .waiters
                        .remove(task);
                    match self.locks[&lock_id].owner {
                        Some(owner) if owner != task => owner_to_recompute = Some(owner),
                        _ => {}
                    }
                }
            }
            TaskState::Running | TaskState::Deleted => {}
        }

        // Tombstone before releasing locks so nothing along the release
        // path can requeue the dying task.
        {
            let tcb = self.tasks.get_mut(&task).expect("remove of unknown task");
            tcb.state = TaskState::Deleted;
            tcb.blocked_on = None;
            tcb.wake_at_tick = None;
            tcb.timeout_at_tick = None;
            tcb.busy_remaining = 0;
        }

        if let Some(owner) = owner_to_recompute {
            self.propagate_inheritance(owner);
        }

        // Release held locks as if given, with ownership handoff.
        let owned: Vec<LockId> = self.tasks[&task].owned_locks.clone();
        for lock_id in owned {
            self.release_lock(lock_id);
        }

        let released = self
            .tasks
            .get_mut(&task)
            .expect("remove of unknown task")
            .release_resources();
        self.stack_bytes_free += released;

        self.audit.record(SchedEvent::TaskDeleted { task, tick: now });

        if was_running {
            self.dispatch_next();
        } else {
            self.maybe_preempt();
        }
    }

    fn set_outcome(&mut self, task: TaskId, outcome: SyscallOutcome) {
        self.tasks
            .get_mut(&task)
            .expect("outcome for unknown task")
            .last_outcome = outcome;
    }
}

impl Default for SimulatedRtos {
    fn default() -> Self {
        Self::new()
    }
}

impl RtosApi for SimulatedRtos {
    fn create_task(&mut self, spec: TaskSpec, behavior: TaskBehavior) -> Result<TaskId, RtosError> {
        if let Some(cap) = self.config.max_tasks {
            if self.task_count() >= cap {
                return Err(RtosError::AllocationFailure(format!(
                    "task cap of {} reached",
                    cap
                )));
            }
        }
        if spec.stack_bytes > self.stack_bytes_free {
            return Err(RtosError::AllocationFailure(format!(
                "stack pool exhausted: {} bytes requested, {} free",
                spec.stack_bytes, self.stack_bytes_free
            )));
        }

        let priority = self.clamp_priority(spec.priority);
        let task = TaskId::from_raw(self.next_task_raw);
        self.next_task_raw += 1;
        self.stack_bytes_free -= spec.stack_bytes;
        self.tasks
            .insert(task, Tcb::new(spec.name, priority, spec.stack_bytes, behavior));
        self.ready.push_tail(task, priority);
        self.audit.record(SchedEvent::TaskCreated {
            task,
            priority,
            tick: self.clock.current_tick(),
        });
        // creation can preempt immediately
        self.maybe_preempt();
        Ok(task)
    }

    fn delete_task(&mut self, task: TaskId) -> Result<(), RtosError> {
        assert!(task != Self::IDLE_TASK, "Cannot delete the idle task");
        match self.tasks.get(&task) {
            None => return Err(RtosError::InvalidTaskHandle(task)),
            Some(tcb) if tcb.state == TaskState::Deleted => {
                return Err(RtosError::InvalidTaskHandle(task))
            }
            Some(_) => {}
        }
        self.remove_task(task);
        Ok(())
    }

    fn create_lock(&mut self, inherits_priority: bool) -> Result<LockId, RtosError> {
        let lock = LockId::from_raw(self.next_lock_raw);
        self.next_lock_raw += 1;
        self.locks.insert(lock, Lock::new(inherits_priority));
        Ok(lock)
    }

    fn tick(&mut self) {
        self.advance_cycles(self.clock.cycles_until_next_tick());
    }

    fn get_task_status(&self, task: TaskId) -> Result<TaskStatus, RtosError> {
        let tcb = self
            .tasks
            .get(&task)
            .ok_or(RtosError::InvalidTaskHandle(task))?;
        if tcb.state == TaskState::Deleted {
            return Err(RtosError::InvalidTaskHandle(task));
        }
        Ok(TaskStatus {
            state: tcb.state,
            name: tcb.name.clone(),
            base_priority: tcb.base_priority,
            effective_priority: tcb.effective_priority,
            runtime_cycles: tcb.runtime_cycles,
        })
    }

    fn current_tick(&self) -> u64 {
        self.clock.current_tick()
    }
}
