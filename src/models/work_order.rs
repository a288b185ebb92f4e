use chrono::{DateTime, Utc};
use serde::Serialize;

/// Billing-relevant lifecycle of a work order. The timer controller only
/// ever moves NotStarted → InProgress; the rest belongs to the surrounding
/// job management flow.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum WorkOrderStatus {
    NotStarted,
    InProgress,
    ReadyToBill,
    Billed,
}

impl WorkOrderStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::NotStarted => "not_started",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::ReadyToBill => "ready_to_bill",
            WorkOrderStatus::Billed => "billed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(WorkOrderStatus::NotStarted),
            "in_progress" => Some(WorkOrderStatus::InProgress),
            "ready_to_bill" => Some(WorkOrderStatus::ReadyToBill),
            "billed" => Some(WorkOrderStatus::Billed),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkOrder {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub status: WorkOrderStatus,
    pub deleted_at: Option<DateTime<Utc>>,
}
