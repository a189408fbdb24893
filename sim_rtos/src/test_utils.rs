//! Test utilities for scheduling scenarios
//!
//! Helper functions shared by the scheduling and inversion tests. They
//! panic on invalid handles; a scenario asking about a task it never
//! created is a bug in the scenario.

use crate::SimulatedRtos;
use rtos_api::{RtosApi, TaskState};
use rtos_types::{Priority, TaskId};

/// Advances the kernel by `n` full ticks
pub fn run_ticks(kernel: &mut SimulatedRtos, n: u64) {
    for _ in 0..n {
        kernel.tick();
    }
}

/// Returns a task's accumulated runtime in cycles
pub fn runtime_of(kernel: &SimulatedRtos, task: TaskId) -> u64 {
    kernel
        .get_task_status(task)
        .expect("status of a live task")
        .runtime_cycles
}

/// Returns a task's scheduling state
pub fn state_of(kernel: &SimulatedRtos, task: TaskId) -> TaskState {
    kernel
        .get_task_status(task)
        .expect("status of a live task")
        .state
}

/// Returns a task's effective priority, inherited boost included
pub fn effective_of(kernel: &SimulatedRtos, task: TaskId) -> Priority {
    kernel
        .get_task_status(task)
        .expect("status of a live task")
        .effective_priority
}

/// Samples a task's runtime counter at fixed tick intervals
///
/// Runs the kernel `samples` times for `interval_ticks` each and records
/// the counter after every interval. A starving task shows up as a flat
/// sequence; a progressing one strictly climbs.
pub fn sample_runtimes(
    kernel: &mut SimulatedRtos,
    task: TaskId,
    samples: usize,
    interval_ticks: u64,
) -> Vec<u64> {
    let mut readings = Vec::with_capacity(samples);
    for _ in 0..samples {
        run_ticks(kernel, interval_ticks);
        readings.push(runtime_of(kernel, task));
    }
    readings
}
