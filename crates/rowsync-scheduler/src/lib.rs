//! # rowsync-scheduler
//!
//! Concurrent job distribution for the rowsync worker pool.
//!
//! Workers call [`JobScheduler::claim_or_borrow`] in a loop: each call
//! hands out an unclaimed table in seed order, or — once every table is
//! claimed — a borrowed reference to another worker's table that still has
//! shareable range-check tasks, so no thread idles while partitionable
//! work remains.
//!
//! This crate provides:
//! - [`AbortBarrier`](barrier::AbortBarrier) - Cooperative cancellation shared by all waits
//! - [`TableJob`](job::TableJob) - Per-table work queues and counters
//! - [`JobScheduler`](scheduler::JobScheduler) - Claim, borrow, publish, complete, abort

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod barrier;
pub mod error;
pub mod job;
pub mod scheduler;

// Re-export commonly used types
pub use barrier::{AbortBarrier, Shared};
pub use error::{Aborted, SchedulerResult};
pub use job::{JobState, TableJob};
pub use scheduler::JobScheduler;
