//! Error types for the scheduler

use thiserror::Error;

/// Synchronization was cancelled while the caller was asking for work.
///
/// The only failure this core propagates: database and hashing errors are
/// handled by the surrounding worker, which reacts by calling
/// [`JobScheduler::abort`](crate::scheduler::JobScheduler::abort).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("synchronization aborted")]
pub struct Aborted;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, Aborted>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Aborted.to_string(), "synchronization aborted");
    }
}
