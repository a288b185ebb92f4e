use chrono::{DateTime, Utc};
use serde::Serialize;

/// Action tags written to the audit log. The set is closed on purpose:
/// every mutating operation in the engine maps to exactly one tag.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AuditAction {
    Start,
    Stop,
    /// A running timer closed implicitly because the worker switched tasks.
    AutoStop,
    Transition,
    UnlockForCorrection,
    Adjust,
    SoftDelete,
}

impl AuditAction {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AuditAction::Start => "START",
            AuditAction::Stop => "STOP",
            AuditAction::AutoStop => "AUTO_STOP",
            AuditAction::Transition => "TRANSITION",
            AuditAction::UnlockForCorrection => "UNLOCK_FOR_CORRECTION",
            AuditAction::Adjust => "ADJUST",
            AuditAction::SoftDelete => "SOFT_DELETE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "START" => Some(AuditAction::Start),
            "STOP" => Some(AuditAction::Stop),
            "AUTO_STOP" => Some(AuditAction::AutoStop),
            "TRANSITION" => Some(AuditAction::Transition),
            "UNLOCK_FOR_CORRECTION" => Some(AuditAction::UnlockForCorrection),
            "ADJUST" => Some(AuditAction::Adjust),
            "SOFT_DELETE" => Some(AuditAction::SoftDelete),
            _ => None,
        }
    }
}

/// One immutable audit row: who did what to which entity, with JSON
/// snapshots of the record before and after. Rows are only ever inserted,
/// in the same transaction as the mutation they describe.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor_id: i64,
    pub before_json: Option<String>,
    pub after_json: Option<String>,
    pub created_at: DateTime<Utc>,
}
