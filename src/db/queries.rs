//! Prepared-statement queries over the shop schema.
//!
//! Every function takes a `&Connection` so it can run either standalone or
//! inside an open transaction (rusqlite's `Transaction` derefs to
//! `Connection`).

use crate::errors::{AppError, AppResult};
use crate::models::{ApprovalState, Role, Task, TimeEntry, WorkOrder, WorkOrderStatus, Worker};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// SQLITE_CONSTRAINT_UNIQUE: primary code 19, extended code (19 | 8<<8).
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Structurally-typed check for a unique-constraint violation.
///
/// The start race is detected through this, never through matching the
/// error message or index name, so a storage engine update cannot silently
/// break the race-loser path.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && e.extended_code == SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// Map low-level transaction failures: busy/locked become retryable
/// conflicts, everything else stays a plain database error.
pub fn map_tx_err(e: rusqlite::Error) -> AppError {
    match &e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::DatabaseBusy
                || f.code == rusqlite::ErrorCode::DatabaseLocked =>
        {
            AppError::Conflict(e.to_string())
        }
        _ => AppError::Db(e),
    }
}

// ---------------------------
// Timestamp mapping
// ---------------------------

pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn ts_from_db(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| from_sql_err(AppError::InvalidTimestamp(s.to_string())))
}

fn opt_ts_from_db(s: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    s.as_deref().map(ts_from_db).transpose()
}

fn from_sql_err(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

// ---------------------------
// Row mapping
// ---------------------------

pub fn map_entry_row(row: &Row) -> rusqlite::Result<TimeEntry> {
    let state_str: String = row.get("approval_state")?;
    let approval_state = ApprovalState::from_db_str(&state_str)
        .ok_or_else(|| from_sql_err(AppError::InvalidApprovalState(state_str.clone())))?;

    Ok(TimeEntry {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        task_id: row.get("task_id")?,
        work_order_id: row.get("work_order_id")?,
        started_at: ts_from_db(&row.get::<_, String>("started_at")?)?,
        ended_at: opt_ts_from_db(row.get("ended_at")?)?,
        duration_secs: row.get("duration_secs")?,
        notes: row.get("notes")?,
        stop_reason: row.get("stop_reason")?,
        goodwill: row.get::<_, i64>("goodwill")? != 0,
        edited_at: opt_ts_from_db(row.get("edited_at")?)?,
        edited_reason: row.get("edited_reason")?,
        approval_state,
        approver_id: row.get("approver_id")?,
        approved_at: opt_ts_from_db(row.get("approved_at")?)?,
        deleted_at: opt_ts_from_db(row.get("deleted_at")?)?,
        created_at: ts_from_db(&row.get::<_, String>("created_at")?)?,
    })
}

fn map_worker_row(row: &Row) -> rusqlite::Result<Worker> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str)
        .ok_or_else(|| from_sql_err(AppError::InvalidRole(role_str.clone())))?;

    Ok(Worker {
        id: row.get("id")?,
        name: row.get("name")?,
        role,
        deleted_at: opt_ts_from_db(row.get("deleted_at")?)?,
    })
}

fn map_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        work_order_id: row.get("work_order_id")?,
        title: row.get("title")?,
        assigned_worker_id: row.get("assigned_worker_id")?,
        done: row.get::<_, i64>("done")? != 0,
        deleted_at: opt_ts_from_db(row.get("deleted_at")?)?,
    })
}

fn map_order_row(row: &Row) -> rusqlite::Result<WorkOrder> {
    let status_str: String = row.get("status")?;
    let status = WorkOrderStatus::from_db_str(&status_str)
        .ok_or_else(|| from_sql_err(AppError::InvalidState(status_str.clone())))?;

    Ok(WorkOrder {
        id: row.get("id")?,
        code: row.get("code")?,
        title: row.get("title")?,
        status,
        deleted_at: opt_ts_from_db(row.get("deleted_at")?)?,
    })
}

// ---------------------------
// Workers / orders / tasks
// ---------------------------

pub fn insert_worker(conn: &Connection, name: &str, role: Role) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO workers (name, role) VALUES (?1, ?2)",
        params![name, role.to_db_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_work_order(conn: &Connection, code: &str, title: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO work_orders (code, title) VALUES (?1, ?2)",
        params![code, title],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_task(
    conn: &Connection,
    work_order_id: i64,
    title: &str,
    assigned_worker_id: i64,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (work_order_id, title, assigned_worker_id) VALUES (?1, ?2, ?3)",
        params![work_order_id, title, assigned_worker_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_worker(conn: &Connection, id: i64) -> AppResult<Worker> {
    conn.query_row("SELECT * FROM workers WHERE id = ?1", [id], map_worker_row)
        .optional()?
        .filter(|w| w.deleted_at.is_none())
        .ok_or(AppError::NotFound("worker", id))
}

pub fn get_task(conn: &Connection, id: i64) -> AppResult<Task> {
    conn.query_row("SELECT * FROM tasks WHERE id = ?1", [id], map_task_row)
        .optional()?
        .filter(|t| !t.is_deleted())
        .ok_or(AppError::NotFound("task", id))
}

pub fn get_work_order(conn: &Connection, id: i64) -> AppResult<WorkOrder> {
    conn.query_row("SELECT * FROM work_orders WHERE id = ?1", [id], map_order_row)
        .optional()?
        .filter(|o| o.deleted_at.is_none())
        .ok_or(AppError::NotFound("work order", id))
}

pub fn set_work_order_status(
    conn: &Connection,
    id: i64,
    status: WorkOrderStatus,
) -> AppResult<()> {
    conn.execute(
        "UPDATE work_orders SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    Ok(())
}

pub fn mark_task_done(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("UPDATE tasks SET done = 1 WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound("task", id));
    }
    Ok(())
}

pub fn soft_delete_task(conn: &Connection, id: i64, now: &DateTime<Utc>) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE tasks SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![ts_to_db(now), id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound("task", id));
    }
    Ok(())
}

pub fn soft_delete_work_order(conn: &Connection, id: i64, now: &DateTime<Utc>) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE work_orders SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![ts_to_db(now), id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound("work order", id));
    }
    Ok(())
}

pub fn insert_work_order_comment(
    conn: &Connection,
    work_order_id: i64,
    author_id: i64,
    body: &str,
    now: &DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO work_order_comments (work_order_id, author_id, body, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![work_order_id, author_id, body, ts_to_db(now)],
    )?;
    Ok(())
}

// ---------------------------
// Time entries
// ---------------------------

pub fn get_entry(conn: &Connection, id: i64) -> AppResult<TimeEntry> {
    conn.query_row("SELECT * FROM time_entries WHERE id = ?1", [id], map_entry_row)
        .optional()?
        .filter(|e| !e.is_deleted())
        .ok_or(AppError::NotFound("time entry", id))
}

/// The worker's single running entry, if any. Well-defined because the
/// partial unique index admits at most one such row.
pub fn running_entry_for_worker(conn: &Connection, worker_id: i64) -> AppResult<Option<TimeEntry>> {
    let entry = conn
        .query_row(
            "SELECT * FROM time_entries
             WHERE worker_id = ?1 AND ended_at IS NULL AND deleted_at IS NULL",
            [worker_id],
            map_entry_row,
        )
        .optional()?;
    Ok(entry)
}

/// Insert a fresh running entry. Propagates the raw rusqlite error so the
/// caller can distinguish the unique-violation race via
/// [`is_unique_violation`].
pub fn insert_running_entry(
    conn: &Connection,
    worker_id: i64,
    task_id: i64,
    work_order_id: i64,
    now: &DateTime<Utc>,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO time_entries
             (worker_id, task_id, work_order_id, started_at, approval_state, created_at)
         VALUES (?1, ?2, ?3, ?4, 'draft', ?5)",
        params![worker_id, task_id, work_order_id, ts_to_db(now), ts_to_db(now)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Close a running entry: set end, duration and optionally the stop
/// metadata. Used by both the explicit stop and the auto-stop-on-switch.
#[allow(clippy::too_many_arguments)]
pub fn close_entry(
    conn: &Connection,
    id: i64,
    ended_at: &DateTime<Utc>,
    duration_secs: i64,
    stop_reason: &str,
    notes: Option<&str>,
    goodwill: bool,
) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE time_entries
         SET ended_at = ?1,
             duration_secs = ?2,
             stop_reason = ?3,
             notes = COALESCE(?4, notes),
             goodwill = ?5
         WHERE id = ?6 AND ended_at IS NULL",
        params![ts_to_db(ended_at), duration_secs, stop_reason, notes, goodwill, id],
    )?;
    if n == 0 {
        return Err(AppError::InvalidState(format!(
            "time entry {} is not running",
            id
        )));
    }
    Ok(())
}

pub fn entries_for_work_order(conn: &Connection, work_order_id: i64) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM time_entries
         WHERE work_order_id = ?1 AND deleted_at IS NULL
         ORDER BY started_at ASC",
    )?;

    let rows = stmt.query_map([work_order_id], map_entry_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Ids of entries a bulk approval may touch: draft or submitted, not
/// soft-deleted, and already stopped (a running timer has no duration to
/// approve yet).
pub fn approvable_entry_ids(conn: &Connection, work_order_id: i64) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM time_entries
         WHERE work_order_id = ?1
           AND deleted_at IS NULL
           AND ended_at IS NOT NULL
           AND approval_state IN ('draft','submitted')
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([work_order_id], |row| row.get(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn soft_delete_entry(conn: &Connection, id: i64, now: &DateTime<Utc>) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE time_entries SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
        params![ts_to_db(now), id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound("time entry", id));
    }
    Ok(())
}
