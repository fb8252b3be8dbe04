//! Background Tasks Module
//!
//! Periodic work spawned alongside the engine.
//!
//! # Tasks
//! - Cleanup: runs the eviction policy at the configured cadence

mod cleanup;

pub use cleanup::spawn_cleanup_task;
