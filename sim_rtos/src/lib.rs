//! # Simulated RTOS
//!
//! This crate provides a simulated implementation of the RTOS API.
//!
//! ## Purpose
//!
//! The simulated kernel makes scheduling behavior testable without
//! hardware:
//! - Runs under `cargo test`
//! - Deterministic (a counted cycle clock, no real concurrency)
//! - Fast (no real context switches or interrupts)
//! - Inspectable (task states, lock owners and runtime counters are
//!   directly readable, and every scheduling decision is logged)
//!
//! ## Philosophy
//!
//! **The schedule is the product.**
//!
//! Priority inversion, inheritance chains and starvation are timing
//! phenomena; on real hardware they surface as flaky latency spikes. Here
//! time only moves when a test advances it, so "high-priority task starved
//! for five consecutive samples" is an exact assertion, not a statistical
//! one. This is not a mock - it is a full scheduler that happens to run
//! in-process.
//!
//! Tasks are behavior closures polled for syscalls ([`workload`] has the
//! common shapes), and the audit log in [`sched_audit`] records every
//! dispatch, preemption, boost and restore for tests to assert against.

pub mod clock;
pub mod sched_audit;
pub mod test_utils;
pub mod workload;

mod kernel;
mod locks;
mod ready_queue;
mod tcb;

pub use kernel::{KernelConfig, SimulatedRtos};
