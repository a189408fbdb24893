//! # RTOS Types
//!
//! This crate defines the fundamental types used throughout PrioSim.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Handles over pointers**: Tasks and locks are referred to by small,
//!   stable integer handles that remain meaningful across the API boundary.
//! - **Type safety first**: A `TaskId` cannot be confused with a `LockId`,
//!   a `Priority` cannot be confused with a `Ticks` count.
//! - **Determinism**: Handles are assigned sequentially, never randomly,
//!   so repeated runs produce identical identifiers.
//!
//! ## Key Types
//!
//! - [`TaskId`]: Stable handle for a task
//! - [`LockId`]: Stable handle for a lock (mutex or semaphore)
//! - [`Priority`]: Fixed scheduling priority level
//! - [`Ticks`]: Duration measured in scheduler ticks

pub mod ids;
pub mod priority;
pub mod time;

pub use ids::{LockId, TaskId};
pub use priority::Priority;
pub use time::Ticks;
