//! Reusable task behaviors
//!
//! Small state machines covering the workload shapes the scheduling
//! scenarios need: pure computation, cooperative yielding, periodic work,
//! and critical sections around a lock. Each builder returns a boxed
//! behavior ready to hand to `create_task`; per-task state lives in the
//! closure's captures.

use rtos_api::{Syscall, SyscallOutcome, TaskBehavior};
use rtos_types::{LockId, Ticks};

/// Spins forever. The kernel installs this as the idle task's behavior.
pub fn idle_spin() -> TaskBehavior {
    Box::new(|_| Syscall::Busy { cycles: u64::MAX })
}

/// Computes continuously, re-requesting `cycles` of work at every poll
pub fn busy_loop(cycles: u64) -> TaskBehavior {
    Box::new(move |_| Syscall::Busy { cycles })
}

/// Computes in `burst_cycles` stretches with a yield between them
pub fn yielding_loop(burst_cycles: u64) -> TaskBehavior {
    let mut working = false;
    Box::new(move |_| {
        working = !working;
        if working {
            Syscall::Busy {
                cycles: burst_cycles,
            }
        } else {
            Syscall::Yield
        }
    })
}

/// Computes a burst, then sleeps for `period` ticks, forever
pub fn periodic(burst_cycles: u64, period: Ticks) -> TaskBehavior {
    let mut working = false;
    Box::new(move |_| {
        working = !working;
        if working {
            Syscall::Busy {
                cycles: burst_cycles,
            }
        } else {
            Syscall::Delay { ticks: period }
        }
    })
}

/// Sleeps for `ticks` at every poll
pub fn sleeper(ticks: Ticks) -> TaskBehavior {
    Box::new(move |_| Syscall::Delay { ticks })
}

/// Computes `cycles` once, then exits
pub fn one_shot(cycles: u64) -> TaskBehavior {
    let mut done = false;
    Box::new(move |_| {
        if done {
            Syscall::Exit
        } else {
            done = true;
            Syscall::Busy { cycles }
        }
    })
}

/// Take -> hold for `hold_cycles` -> give, in a loop
///
/// A failed take is retried. Pair a contended caller with a nonzero
/// `timeout` (or `Ticks::FOREVER`) so the retry parks the task instead of
/// spinning against the runaway guard.
pub fn lock_cycle(lock: LockId, hold_cycles: u64, timeout: Ticks) -> TaskBehavior {
    let mut step = 0u8;
    Box::new(move |ctx| match step {
        0 => {
            step = 1;
            Syscall::Take { lock, timeout }
        }
        1 => {
            if ctx.last_outcome == SyscallOutcome::Completed {
                step = 2;
                Syscall::Busy {
                    cycles: hold_cycles,
                }
            } else {
                Syscall::Take { lock, timeout }
            }
        }
        _ => {
            step = 0;
            Syscall::Give { lock }
        }
    })
}

/// Take -> hold for `hold_cycles` -> give -> exit
///
/// Same retry rule as [`lock_cycle`], but the task deletes itself after
/// one pass through the critical section.
pub fn lock_once(lock: LockId, hold_cycles: u64, timeout: Ticks) -> TaskBehavior {
    let mut step = 0u8;
    Box::new(move |ctx| match step {
        0 => {
            step = 1;
            Syscall::Take { lock, timeout }
        }
        1 => {
            if ctx.last_outcome == SyscallOutcome::Completed {
                step = 2;
                Syscall::Busy {
                    cycles: hold_cycles,
                }
            } else {
                Syscall::Take { lock, timeout }
            }
        }
        2 => {
            step = 3;
            Syscall::Give { lock }
        }
        _ => Syscall::Exit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtos_api::TaskContext;

    fn ctx(last_outcome: SyscallOutcome) -> TaskContext {
        TaskContext {
            now_tick: 0,
            runtime_cycles: 0,
            last_outcome,
        }
    }

    #[test]
    fn test_busy_loop_repeats() {
        let mut behavior = busy_loop(500);
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 500 }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 500 }
        );
    }

    #[test]
    fn test_yielding_loop_alternates() {
        let mut behavior = yielding_loop(100);
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 100 }
        );
        assert_eq!(behavior(&ctx(SyscallOutcome::Completed)), Syscall::Yield);
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 100 }
        );
    }

    #[test]
    fn test_one_shot_exits_after_burst() {
        let mut behavior = one_shot(250);
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 250 }
        );
        assert_eq!(behavior(&ctx(SyscallOutcome::Completed)), Syscall::Exit);
    }

    #[test]
    fn test_lock_cycle_walks_take_hold_give() {
        let lock = LockId::from_raw(7);
        let mut behavior = lock_cycle(lock, 1000, Ticks::FOREVER);

        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Take {
                lock,
                timeout: Ticks::FOREVER,
            }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 1000 }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Give { lock }
        );
        // and around again
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Take {
                lock,
                timeout: Ticks::FOREVER,
            }
        );
    }

    #[test]
    fn test_lock_cycle_retries_after_timeout() {
        let lock = LockId::from_raw(7);
        let timeout = Ticks::new(5);
        let mut behavior = lock_cycle(lock, 1000, timeout);

        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Take { lock, timeout }
        );
        // the take timed out; the behavior asks again instead of holding
        assert_eq!(
            behavior(&ctx(SyscallOutcome::TimedOut)),
            Syscall::Take { lock, timeout }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 1000 }
        );
    }

    #[test]
    fn test_lock_once_ends_with_exit() {
        let lock = LockId::from_raw(2);
        let mut behavior = lock_once(lock, 100, Ticks::FOREVER);

        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Take {
                lock,
                timeout: Ticks::FOREVER,
            }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 100 }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Give { lock }
        );
        assert_eq!(behavior(&ctx(SyscallOutcome::Completed)), Syscall::Exit);
    }

    #[test]
    fn test_periodic_sleeps_between_bursts() {
        let mut behavior = periodic(300, Ticks::new(4));
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Busy { cycles: 300 }
        );
        assert_eq!(
            behavior(&ctx(SyscallOutcome::Completed)),
            Syscall::Delay {
                ticks: Ticks::new(4)
            }
        );
    }
}
