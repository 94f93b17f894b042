//! Job scheduler implementation
//!
//! Decides which table each worker works on. Whole tables are handed out
//! in seed order; once none remain unclaimed, idle workers borrow
//! range-check tasks from tables owned by busy workers.

use crate::barrier::{AbortBarrier, Shared};
use crate::error::SchedulerResult;
use crate::job::TableJob;
use parking_lot::{MutexGuard, RwLock};
use rowsync_types::Table;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Scheduler-wide collections, guarded by the barrier's shared lock.
#[derive(Debug, Default)]
struct SchedulerState {
    /// One-shot flag: set the first time a worker finds no whole table
    /// left to claim
    sharing: bool,
    /// Tables not yet claimed, in seed order
    pending: VecDeque<Arc<TableJob>>,
    /// Tables claimed exclusively by one worker, keyed by table id
    in_flight: HashMap<String, Arc<TableJob>>,
    /// Tables currently advertising borrowable work, keyed by table id;
    /// membership is independent of pending/in-flight
    shareable: HashMap<String, Arc<TableJob>>,
}

impl SchedulerState {
    /// True once every seeded table has been claimed and completed.
    /// Monotonic: tables are only added by seeding, before workers start.
    fn finished(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    /// Activate sharing mode: every current job announces shareable work
    /// from now on, and jobs that already have some become borrowable
    /// immediately.
    fn enable_sharing(&mut self) {
        self.sharing = true;

        let jobs: Vec<Arc<TableJob>> = self
            .pending
            .iter()
            .chain(self.in_flight.values())
            .cloned()
            .collect();

        for job in jobs {
            let mut state = job.lock();
            state.notify_on_shareable = true;
            let ready = state.have_work_to_share();
            drop(state);

            if ready {
                self.shareable.insert(job.table_id.clone(), job);
            }
        }
    }
}

/// The concurrent job-distribution scheduler.
///
/// Seeded once with the full set of tables, then driven concurrently by
/// every worker thread through [`claim_or_borrow`](Self::claim_or_borrow),
/// [`publish_shareable`](Self::publish_shareable) and
/// [`report_completion`](Self::report_completion). All scheduler-wide
/// state shares the cancellation barrier's single lock and condition, so
/// whole-queue waiting and the abort flag can never race.
pub struct JobScheduler {
    barrier: AbortBarrier<SchedulerState>,
    /// Consistency-snapshot token shared by all workers; written once
    /// before work begins, read-only after (caller discipline)
    snapshot: RwLock<String>,
}

impl JobScheduler {
    /// Create a scheduler for a pool of `workers` threads.
    pub fn new(workers: usize) -> Self {
        Self {
            barrier: AbortBarrier::new(workers, SchedulerState::default()),
            snapshot: RwLock::new(String::new()),
        }
    }

    /// Number of worker threads the pool is sized for.
    pub fn workers(&self) -> usize {
        self.barrier.workers()
    }

    /// Append jobs for `tables` to the pending queue, preserving order.
    ///
    /// Intended to be called once before workers start; repeated calls
    /// append.
    pub fn seed(&self, tables: impl IntoIterator<Item = Table>) {
        let mut shared = self.barrier.lock();
        for table in tables {
            let job = Arc::new(TableJob::new(table));
            tracing::debug!(
                table = %job.table.qualified_name(),
                table_id = %job.table_id,
                "seeded table"
            );
            shared.state.pending.push_back(job);
        }
    }

    /// Hand the calling worker its next unit of work.
    ///
    /// Returns the next unclaimed table (strict seed order, never blocks)
    /// while any remain; afterwards a borrowed reference to another
    /// worker's table that still has shareable range-check tasks, parking
    /// until one is published, everything completes (`Ok(None)`), or
    /// cancellation begins (`Err`). A borrowed job stays owned by its
    /// claimer — the borrower takes tasks from it but never reports its
    /// completion.
    pub fn claim_or_borrow(&self) -> SchedulerResult<Option<Arc<TableJob>>> {
        let mut shared = self.barrier.lock();

        shared.ensure_live()?;

        if let Some(job) = shared.state.pending.pop_front() {
            shared
                .state
                .in_flight
                .insert(job.table_id.clone(), Arc::clone(&job));
            return Ok(Some(job));
        }

        if !shared.state.sharing {
            tracing::debug!("no unclaimed tables remain, enabling work sharing");
            shared.state.enable_sharing();
        }

        self.borrow_work(&mut shared)
    }

    /// Remove `job` from in-flight (and shareable, if advertised) after
    /// its owner finished the table. Wakes parked borrowers once the last
    /// table completes so they observe termination.
    pub fn report_completion(&self, job: &Arc<TableJob>) {
        let mut shared = self.barrier.lock();

        shared.state.shareable.remove(&job.table_id);
        shared.state.in_flight.remove(&job.table_id);

        tracing::debug!(table = %job.table.qualified_name(), "table completed");

        if shared.state.finished() {
            tracing::info!("all tables processed");
            // unblock workers parked in borrow_work
            self.barrier.notify_all();
        }
    }

    /// Advertise `job` as having borrowable range-check tasks and wake
    /// parked workers. Called by the job's owner after adding tasks, once
    /// the job's announce flag is set; earlier calls are harmless.
    pub fn publish_shareable(&self, job: &Arc<TableJob>) {
        let mut shared = self.barrier.lock();
        shared
            .state
            .shareable
            .insert(job.table_id.clone(), Arc::clone(job));
        drop(shared);

        self.barrier.notify_all();
    }

    /// Begin cooperative cancellation.
    ///
    /// Flips the barrier's abort flag (waking everything parked on the
    /// shared condition), then wakes each in-flight job's local condition
    /// so owners parked waiting for borrowed tasks unwind too. Returns
    /// true iff this call performed the flip.
    pub fn abort(&self) -> bool {
        let flipped = self.barrier.abort();

        let shared = self.barrier.lock();
        for job in shared.state.in_flight.values() {
            let _state = job.lock();
            job.notify_borrowers();
        }

        if flipped {
            tracing::warn!("synchronization aborted");
        }
        flipped
    }

    /// Whether cancellation is active.
    pub fn is_aborted(&self) -> bool {
        self.barrier.is_aborted()
    }

    /// True once every seeded table has been claimed and completed.
    pub fn finished(&self) -> bool {
        self.barrier.lock().state.finished()
    }

    /// Number of tables not yet claimed.
    pub fn pending_tables(&self) -> usize {
        self.barrier.lock().state.pending.len()
    }

    /// Number of tables currently claimed by a worker.
    pub fn in_flight_tables(&self) -> usize {
        self.barrier.lock().state.in_flight.len()
    }

    /// Record the consistency-snapshot token all workers will read from.
    /// Write once, before work begins.
    pub fn set_snapshot(&self, snapshot: impl Into<String>) {
        *self.snapshot.write() = snapshot.into();
    }

    /// The consistency-snapshot token.
    pub fn snapshot(&self) -> String {
        self.snapshot.read().clone()
    }

    fn borrow_work(
        &self,
        shared: &mut MutexGuard<'_, Shared<SchedulerState>>,
    ) -> SchedulerResult<Option<Arc<TableJob>>> {
        loop {
            if shared.state.finished() {
                return Ok(None);
            }

            // Scan candidates, re-checking each under the job's own lock:
            // a faster stealer may have emptied a job between its
            // publication and now. Exhausted candidates are dropped; a
            // qualifying job stays advertised for the next borrower.
            let mut found = None;
            let mut stale = Vec::new();
            for (id, job) in shared.state.shareable.iter() {
                if job.lock().have_work_to_share() {
                    found = Some(Arc::clone(job));
                    break;
                }
                stale.push(id.clone());
            }
            for id in &stale {
                shared.state.shareable.remove(id);
            }
            if let Some(job) = found {
                return Ok(Some(job));
            }

            // Woken by publish_shareable, by the completion that finishes
            // the whole queue, or by abort (which wait turns into Err).
            self.barrier.wait(shared)?;
        }
    }
}
