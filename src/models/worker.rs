use chrono::{DateTime, Utc};
use serde::Serialize;

/// Minimal role taxonomy: only what gates timer and approval operations.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Role {
    Mechanic,
    Manager,
    Admin,
}

impl Role {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Mechanic => "mechanic",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "mechanic" => Some(Role::Mechanic),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Unlock-for-correction and other privileged paths.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub deleted_at: Option<DateTime<Utc>>,
}
