//! Per-table scheduling state
//!
//! A [`TableJob`] owns the queues of pending key-range work for one table,
//! guarded by its own lock so unrelated tables never contend. The job
//! lock may be taken while the scheduler's shared lock is held; the
//! reverse nesting is forbidden.

use parking_lot::{Condvar, Mutex, MutexGuard};
use rowsync_types::{primary_key_subdividable, KeyRange, RangeCheck, Table};
use std::collections::{BinaryHeap, VecDeque};
use std::time::Instant;

/// Mutable per-table state, guarded by the job-local lock.
#[derive(Debug, Default)]
pub struct JobState {
    /// Ranges still needing raw row retrieval, in key order. Retrieval is
    /// sequential per table, so these are never handed to borrowers.
    pub ranges_to_retrieve: VecDeque<KeyRange>,
    /// Hash-check tasks, served in descending priority order. The only
    /// shareable units of work.
    pub ranges_to_check: BinaryHeap<RangeCheck>,
    /// Announce new shareable work to the scheduler as it appears; set
    /// once sharing mode activates.
    pub notify_on_shareable: bool,
    /// Set by the owning worker when it starts the table; a job handed
    /// out with this already set is a borrow, not a fresh claim
    pub started_at: Option<Instant>,
    /// Set by the owning worker when the table is done
    pub finished_at: Option<Instant>,
    /// Hash commands issued
    pub hash_commands: usize,
    /// Hash commands completed
    pub hash_commands_completed: usize,
    /// Row-retrieval commands issued
    pub rows_commands: usize,
}

impl JobState {
    /// True iff the job currently exposes at least one range-check task.
    ///
    /// Pure function of the check queue; holding the job lock is enforced
    /// by this living on the guarded state.
    pub fn have_work_to_share(&self) -> bool {
        !self.ranges_to_check.is_empty()
    }
}

/// The scheduling state for one table under synchronization.
///
/// Identity and subdividability are fixed at creation; everything mutable
/// lives in [`JobState`] behind [`TableJob::lock`].
pub struct TableJob {
    /// Table definition
    pub table: Table,
    /// Cached stable identity, the membership key for the scheduler's
    /// in-flight and shareable collections
    pub table_id: String,
    /// Whether the table's key space can be split into sub-ranges
    pub subdividable: bool,

    state: Mutex<JobState>,
    /// Signalled when a borrowed task finishes (and on abort, so owners
    /// parked here unwind)
    borrowed_task_done: Condvar,
}

impl TableJob {
    /// Create the job for a table, deriving identity and subdividability.
    pub fn new(table: Table) -> Self {
        let table_id = table.table_id();
        let subdividable = primary_key_subdividable(&table);
        Self {
            table,
            table_id,
            subdividable,
            state: Mutex::new(JobState::default()),
            borrowed_task_done: Condvar::new(),
        }
    }

    /// Acquire the job-local lock.
    ///
    /// Never acquire the scheduler's shared lock while holding this guard.
    pub fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock()
    }

    /// Park until a borrowed task completes or cancellation wakes the job.
    ///
    /// The caller re-checks its predicate (and the abort flag) on wake.
    pub fn wait_borrowed_task(&self, guard: &mut MutexGuard<'_, JobState>) {
        self.borrowed_task_done.wait(guard);
    }

    /// Wake threads parked on the job-local condition.
    pub fn notify_borrowers(&self) {
        self.borrowed_task_done.notify_all();
    }
}

impl std::fmt::Debug for TableJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableJob")
            .field("table_id", &self.table_id)
            .field("table", &self.table.qualified_name())
            .field("subdividable", &self.subdividable)
            .finish_non_exhaustive()
    }
}
