use crate::models::ApprovalState;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One tracked interval of work against a task.
///
/// A running timer is an entry with `ended_at = None`; the storage layer
/// guarantees at most one of those per worker at any instant.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    pub worker_id: i64,
    pub task_id: i64,
    /// Denormalized parent work order for cheap per-order queries.
    pub work_order_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Whole seconds, computed at stop time; None while running.
    pub duration_secs: Option<i64>,
    pub notes: String,
    /// Why the timer was stopped (set only at stop).
    pub stop_reason: Option<String>,
    /// Goodwill intervals are excluded from billable totals.
    pub goodwill: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub edited_reason: Option<String>,
    pub approval_state: ApprovalState,
    pub approver_id: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
