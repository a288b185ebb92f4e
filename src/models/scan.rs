use crate::models::TimeEntry;
use serde::Serialize;

/// One exception bucket: total number of offending rows plus a bounded
/// sample for display. Buckets are independent; callers paginate.
#[derive(Debug, Serialize)]
pub struct ScanBucket<T> {
    pub count: i64,
    pub items: Vec<T>,
}

impl<T> ScanBucket<T> {
    pub fn is_clean(&self) -> bool {
        self.count == 0
    }
}

/// A work order flagged ready to bill while unapproved entries remain.
#[derive(Debug, Serialize)]
pub struct PrematureBilling {
    pub work_order_id: i64,
    pub code: String,
    pub pending_entries: i64,
}

/// A done task with no positive tracked time.
#[derive(Debug, Serialize)]
pub struct UntrackedTask {
    pub task_id: i64,
    pub work_order_id: i64,
    pub title: String,
}

/// Full result of one exception sweep.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub stale_timers: ScanBucket<TimeEntry>,
    pub premature_billing: ScanBucket<PrematureBilling>,
    pub post_lock_edits: ScanBucket<TimeEntry>,
    pub untracked_done_tasks: ScanBucket<UntrackedTask>,
    pub orphaned_entries: ScanBucket<TimeEntry>,
}

impl ScanReport {
    pub fn total_findings(&self) -> i64 {
        self.stale_timers.count
            + self.premature_billing.count
            + self.post_lock_edits.count
            + self.untracked_done_tasks.count
            + self.orphaned_entries.count
    }
}
