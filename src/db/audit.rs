//! Append-only audit log writer.
//!
//! `record` must be called with the same connection/transaction that
//! performs the mutation it describes: if the insert fails, the error
//! propagates and the whole transaction rolls back, so a mutation can
//! never commit without its audit trail.

use crate::db::queries::ts_to_db;
use crate::errors::AppResult;
use crate::models::{AuditAction, AuditLogEntry};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use serde::Serialize;

pub const ENTITY_TIME_ENTRY: &str = "time_entry";
pub const ENTITY_WORK_ORDER: &str = "work_order";

/// Write one audit row. Snapshots are serialized to JSON here so callers
/// pass plain domain values.
pub fn record<B: Serialize, A: Serialize>(
    conn: &Connection,
    entity_type: &str,
    entity_id: i64,
    action: AuditAction,
    actor_id: i64,
    before: Option<&B>,
    after: Option<&A>,
    now: &DateTime<Utc>,
) -> AppResult<()> {
    let before_json = before.map(serde_json::to_string).transpose().map_err(|e| {
        crate::errors::AppError::Other(format!("audit snapshot serialization: {}", e))
    })?;
    let after_json = after.map(serde_json::to_string).transpose().map_err(|e| {
        crate::errors::AppError::Other(format!("audit snapshot serialization: {}", e))
    })?;

    let mut stmt = conn.prepare_cached(
        "INSERT INTO audit_log
             (entity_type, entity_id, action, actor_id, before_json, after_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    stmt.execute(params![
        entity_type,
        entity_id,
        action.to_db_str(),
        actor_id,
        before_json,
        after_json,
        ts_to_db(now),
    ])?;

    Ok(())
}

fn map_audit_row(row: &Row) -> rusqlite::Result<AuditLogEntry> {
    let action_str: String = row.get("action")?;
    let action = AuditAction::from_db_str(&action_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(crate::errors::AppError::Other(format!(
                "unknown audit action: {}",
                action_str
            ))),
        )
    })?;

    Ok(AuditLogEntry {
        id: row.get("id")?,
        entity_type: row.get("entity_type")?,
        entity_id: row.get("entity_id")?,
        action,
        actor_id: row.get("actor_id")?,
        before_json: row.get("before_json")?,
        after_json: row.get("after_json")?,
        created_at: {
            let s: String = row.get("created_at")?;
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(crate::errors::AppError::InvalidTimestamp(s)),
                    )
                })?
        },
    })
}

/// Newest-first read of the audit trail, optionally filtered by entity.
pub fn list(
    conn: &Connection,
    entity_type: Option<&str>,
    entity_id: Option<i64>,
    limit: i64,
) -> AppResult<Vec<AuditLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM audit_log
         WHERE (?1 IS NULL OR entity_type = ?1)
           AND (?2 IS NULL OR entity_id = ?2)
         ORDER BY id DESC
         LIMIT ?3",
    )?;

    let rows = stmt.query_map(params![entity_type, entity_id, limit], map_audit_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
