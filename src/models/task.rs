use chrono::{DateTime, Utc};
use serde::Serialize;

/// A unit of work under a work order, assigned to one worker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub work_order_id: i64,
    pub title: String,
    pub assigned_worker_id: i64,
    pub done: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
