//! Cooperative cancellation barrier
//!
//! One abort flag, one mutex, one condvar, shared by every worker thread.
//! The barrier is generic over the state it guards: the scheduler embeds
//! its whole shared state inside the barrier's mutex, so scheduler-wide
//! mutation and whole-queue waiting use a single lock/condition pair and
//! the lock-sharing contract is explicit in the type rather than implied
//! by inheritance.

use crate::error::{Aborted, SchedulerResult};
use parking_lot::{Condvar, Mutex, MutexGuard};

/// State guarded by the barrier's mutex: the abort flag plus whatever the
/// embedding component stores alongside it.
#[derive(Debug)]
pub struct Shared<S> {
    /// Set once by the first [`AbortBarrier::abort`] call
    pub aborted: bool,
    /// Embedded component state, guarded by the same lock
    pub state: S,
}

impl<S> Shared<S> {
    /// Fails with [`Aborted`] when cancellation is active.
    pub fn ensure_live(&self) -> SchedulerResult<()> {
        if self.aborted {
            Err(Aborted)
        } else {
            Ok(())
        }
    }
}

/// Process-wide cooperative cancellation primitive.
///
/// Constructed with the worker count so pool sizing and the barrier agree
/// on how many threads participate. Any operation that parks on the shared
/// condition must go through [`AbortBarrier::wait`], which re-checks the
/// abort flag on every wake.
pub struct AbortBarrier<S> {
    workers: usize,
    shared: Mutex<Shared<S>>,
    cond: Condvar,
}

impl<S> AbortBarrier<S> {
    /// Create a barrier for `workers` threads, guarding `state`.
    pub fn new(workers: usize, state: S) -> Self {
        Self {
            workers,
            shared: Mutex::new(Shared {
                aborted: false,
                state,
            }),
            cond: Condvar::new(),
        }
    }

    /// Number of worker threads this barrier was configured for.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Acquire the shared lock.
    pub fn lock(&self) -> MutexGuard<'_, Shared<S>> {
        self.shared.lock()
    }

    /// Flip the abort flag, waking every thread parked on the shared
    /// condition. Returns true iff this call performed the flip; later
    /// calls are no-ops that still wake waiters.
    pub fn abort(&self) -> bool {
        let mut shared = self.shared.lock();
        let flipped = !shared.aborted;
        shared.aborted = true;
        drop(shared);

        self.cond.notify_all();
        flipped
    }

    /// Whether cancellation is active.
    pub fn is_aborted(&self) -> bool {
        self.shared.lock().aborted
    }

    /// Park on the shared condition until woken.
    ///
    /// Fails with [`Aborted`] when the wake finds cancellation active;
    /// otherwise the caller re-checks its own predicate and may wait again.
    pub fn wait(&self, guard: &mut MutexGuard<'_, Shared<S>>) -> SchedulerResult<()> {
        self.cond.wait(guard);
        guard.ensure_live()
    }

    /// Wake every thread parked on the shared condition.
    pub fn notify_all(&self) {
        self.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_abort_first_call_wins() {
        let barrier = AbortBarrier::new(4, ());

        assert!(!barrier.is_aborted());
        assert!(barrier.abort());
        assert!(barrier.is_aborted());

        // Subsequent calls do not report the transition
        assert!(!barrier.abort());
        assert!(barrier.is_aborted());
    }

    #[test]
    fn test_ensure_live() {
        let barrier = AbortBarrier::new(1, ());
        assert!(barrier.lock().ensure_live().is_ok());

        barrier.abort();
        assert_eq!(barrier.lock().ensure_live(), Err(Aborted));
    }

    #[test]
    fn test_workers_accessor() {
        let barrier = AbortBarrier::new(8, ());
        assert_eq!(barrier.workers(), 8);
    }

    #[test]
    fn test_abort_wakes_waiter() {
        let barrier = Arc::new(AbortBarrier::new(2, ()));

        let waiter = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || -> SchedulerResult<()> {
                let mut guard = barrier.lock();
                loop {
                    guard.ensure_live()?;
                    barrier.wait(&mut guard)?;
                }
            })
        };

        // The waiter either parks first (woken by notify) or aborts the
        // instant it first checks the flag; both paths must end in Aborted.
        barrier.abort();
        assert_eq!(waiter.join().unwrap(), Err(Aborted));
    }

    #[test]
    fn test_shared_state_under_one_lock() {
        let barrier = Arc::new(AbortBarrier::new(4, 0usize));
        let mut handles = vec![];

        for _ in 0..4 {
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    barrier.lock().state += 1;
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(barrier.lock().state, 4000);
    }
}
