//! Scheduling Test Utilities
//!
//! This crate provides shared fixtures for the scheduling and priority
//! inversion tests.
//!
//! ## Test Philosophy
//!
//! - **Determinism**: every scenario is staged with explicit cycle
//!   advancement; a failing assertion reproduces identically on every run
//! - **Counters over timing**: properties are asserted on runtime
//!   counters and task states, never on wall-clock measurements
//! - **Inversion on demand**: the classic three-task inversion is a
//!   fixture, staged identically for the inheriting and non-inheriting
//!   lock flavors so their outcomes can be compared

use rtos_api::{RtosApi, TaskSpec};
use rtos_types::{LockId, Priority, TaskId, Ticks};
use sim_rtos::workload::{busy_loop, lock_cycle};
use sim_rtos::SimulatedRtos;

/// Handles of the staged inversion scenario
pub struct InversionScenario {
    pub lock: LockId,
    pub low: TaskId,
    pub medium: TaskId,
    pub high: TaskId,
}

/// Cycles the low task holds the lock for
pub const LOW_HOLD_CYCLES: u64 = 50_000;

/// Stages the classic three-task priority inversion
///
/// Low (priority 1) acquires the lock and starts a long hold. High
/// (priority 5) then contends and blocks; with an inheriting lock this
/// boosts Low. Medium (priority 3) arrives last, never touches the lock,
/// and wants nothing but the CPU.
///
/// With `inherits = false` the returned kernel is mid-inversion: Medium
/// is Running while High waits on a lock only Low can release. With
/// `inherits = true` Low is Running at High's priority.
pub fn inversion_scenario(inherits: bool) -> (SimulatedRtos, InversionScenario) {
    let mut kernel = SimulatedRtos::new();
    let lock = kernel.create_lock(inherits).expect("Failed to create lock");

    // Low takes the lock and gets a head start on its hold.
    let low = kernel
        .create_task(
            TaskSpec::new("low".to_string(), Priority::new(1)),
            lock_cycle(lock, LOW_HOLD_CYCLES, Ticks::FOREVER),
        )
        .expect("Failed to create low task");
    kernel.advance_cycles(100);

    // High arrives and contends.
    let high = kernel
        .create_task(
            TaskSpec::new("high".to_string(), Priority::new(5)),
            lock_cycle(lock, 1_000, Ticks::FOREVER),
        )
        .expect("Failed to create high task");
    kernel.advance_cycles(10);

    // Medium just wants the CPU.
    let medium = kernel
        .create_task(
            TaskSpec::new("medium".to_string(), Priority::new(3)),
            busy_loop(1_000_000),
        )
        .expect("Failed to create medium task");

    (
        kernel,
        InversionScenario {
            lock,
            low,
            medium,
            high,
        },
    )
}

/// Spawns a CPU-bound task
pub fn spawn_busy(
    kernel: &mut SimulatedRtos,
    name: &str,
    priority: u8,
    cycles: u64,
) -> TaskId {
    kernel
        .create_task(
            TaskSpec::new(name.to_string(), Priority::new(priority)),
            busy_loop(cycles),
        )
        .expect("Failed to create busy task")
}
