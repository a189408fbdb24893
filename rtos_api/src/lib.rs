//! # RTOS API
//!
//! This crate defines the interface between task code, test harnesses and
//! the scheduler kernel.
//!
//! ## Philosophy
//!
//! The kernel provides **mechanisms**, not policies:
//! - Task creation with an explicit priority and workload (not forking)
//! - Lock primitives with explicit inheritance semantics
//! - Time management (explicit ticks, not ambient wall-clock)
//! - Status snapshots (copy-out, never references into kernel state)
//!
//! ## Design Goals
//!
//! 1. **Testability**: The entire API can be driven from `cargo test`
//! 2. **Explicitness**: No hidden state; every scheduling effect has a
//!    visible cause
//! 3. **Handle safety**: Stale handles are rejected, never dereferenced
//! 4. **Simplicity**: Minimal surface area
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - POSIX threads (no shared-memory concurrency, no signals)
//! - A real-time guarantee (the simulation is deterministic, not timely)
//! - A specific kernel (the trait can be implemented many ways)

pub mod api;
pub mod error;
pub mod status;
pub mod syscall;

pub use api::{RtosApi, TaskSpec};
pub use error::RtosError;
pub use status::{TaskState, TaskStatus};
pub use syscall::{Syscall, SyscallOutcome, TaskBehavior, TaskContext};
