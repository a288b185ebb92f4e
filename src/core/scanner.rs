//! Exception reconciliation scanner.
//!
//! Five independent read-only sweeps over the store, one per bucket. The
//! scanner never mutates anything and holds no transaction, so it is safe
//! to run concurrently with every other operation.

use crate::core::clock::Clock;
use crate::db::pool::DbPool;
use crate::db::queries::{map_entry_row, ts_to_db};
use crate::errors::AppResult;
use crate::models::TimeEntry;
use crate::models::scan::{PrematureBilling, ScanBucket, ScanReport, UntrackedTask};
use chrono::Duration;
use rusqlite::{Connection, params};

fn collect_entries(
    conn: &Connection,
    count_sql: &str,
    count_params: impl rusqlite::Params,
    list_sql: &str,
    list_params: impl rusqlite::Params,
) -> AppResult<ScanBucket<TimeEntry>> {
    let count: i64 = conn.query_row(count_sql, count_params, |row| row.get(0))?;

    let mut stmt = conn.prepare(list_sql)?;
    let rows = stmt.query_map(list_params, map_entry_row)?;

    let mut items = Vec::new();
    for r in rows {
        items.push(r?);
    }

    Ok(ScanBucket { count, items })
}

/// Bucket 1: running timers older than the staleness threshold.
pub fn stale_timers(
    pool: &mut DbPool,
    clock: &dyn Clock,
    stale_hours: i64,
    limit: i64,
) -> AppResult<ScanBucket<TimeEntry>> {
    let cutoff = ts_to_db(&(clock.now() - Duration::hours(stale_hours)));

    collect_entries(
        &pool.conn,
        "SELECT COUNT(*) FROM time_entries
         WHERE ended_at IS NULL AND deleted_at IS NULL AND started_at < ?1",
        params![cutoff],
        "SELECT * FROM time_entries
         WHERE ended_at IS NULL AND deleted_at IS NULL AND started_at < ?1
         ORDER BY started_at ASC LIMIT ?2",
        params![cutoff, limit],
    )
}

/// Bucket 2: work orders flagged ready to bill while draft/submitted
/// entries remain.
pub fn premature_billing(pool: &mut DbPool, limit: i64) -> AppResult<ScanBucket<PrematureBilling>> {
    const FILTER: &str = "
        FROM work_orders wo
        WHERE wo.status = 'ready_to_bill'
          AND wo.deleted_at IS NULL
          AND EXISTS (
              SELECT 1 FROM time_entries te
              WHERE te.work_order_id = wo.id
                AND te.deleted_at IS NULL
                AND te.approval_state IN ('draft','submitted')
          )";

    let count: i64 = pool.conn.query_row(
        &format!("SELECT COUNT(*) {}", FILTER),
        [],
        |row| row.get(0),
    )?;

    let mut stmt = pool.conn.prepare(&format!(
        "SELECT wo.id, wo.code,
                (SELECT COUNT(*) FROM time_entries te
                 WHERE te.work_order_id = wo.id
                   AND te.deleted_at IS NULL
                   AND te.approval_state IN ('draft','submitted'))
         {} ORDER BY wo.id ASC LIMIT ?1",
        FILTER
    ))?;

    let rows = stmt.query_map([limit], |row| {
        Ok(PrematureBilling {
            work_order_id: row.get(0)?,
            code: row.get(1)?,
            pending_entries: row.get(2)?,
        })
    })?;

    let mut items = Vec::new();
    for r in rows {
        items.push(r?);
    }

    Ok(ScanBucket { count, items })
}

/// Bucket 3: entries edited after approval or lock.
pub fn post_lock_edits(pool: &mut DbPool, limit: i64) -> AppResult<ScanBucket<TimeEntry>> {
    collect_entries(
        &pool.conn,
        "SELECT COUNT(*) FROM time_entries
         WHERE deleted_at IS NULL
           AND edited_at IS NOT NULL
           AND approval_state IN ('approved','locked')",
        [],
        "SELECT * FROM time_entries
         WHERE deleted_at IS NULL
           AND edited_at IS NOT NULL
           AND approval_state IN ('approved','locked')
         ORDER BY edited_at DESC LIMIT ?1",
        params![limit],
    )
}

/// Bucket 4: done tasks with zero positive tracked time.
pub fn untracked_done_tasks(pool: &mut DbPool, limit: i64) -> AppResult<ScanBucket<UntrackedTask>> {
    const FILTER: &str = "
        FROM tasks t
        WHERE t.done = 1
          AND t.deleted_at IS NULL
          AND NOT EXISTS (
              SELECT 1 FROM time_entries te
              WHERE te.task_id = t.id
                AND te.deleted_at IS NULL
                AND te.duration_secs > 0
          )";

    let count: i64 = pool.conn.query_row(
        &format!("SELECT COUNT(*) {}", FILTER),
        [],
        |row| row.get(0),
    )?;

    let mut stmt = pool.conn.prepare(&format!(
        "SELECT t.id, t.work_order_id, t.title {} ORDER BY t.id ASC LIMIT ?1",
        FILTER
    ))?;

    let rows = stmt.query_map([limit], |row| {
        Ok(UntrackedTask {
            task_id: row.get(0)?,
            work_order_id: row.get(1)?,
            title: row.get(2)?,
        })
    })?;

    let mut items = Vec::new();
    for r in rows {
        items.push(r?);
    }

    Ok(ScanBucket { count, items })
}

/// Bucket 5: live entries whose parent task or work order was soft-deleted.
pub fn orphaned_entries(pool: &mut DbPool, limit: i64) -> AppResult<ScanBucket<TimeEntry>> {
    collect_entries(
        &pool.conn,
        "SELECT COUNT(*) FROM time_entries te
         WHERE te.deleted_at IS NULL
           AND (EXISTS (SELECT 1 FROM tasks t
                        WHERE t.id = te.task_id AND t.deleted_at IS NOT NULL)
             OR EXISTS (SELECT 1 FROM work_orders wo
                        WHERE wo.id = te.work_order_id AND wo.deleted_at IS NOT NULL))",
        [],
        "SELECT te.* FROM time_entries te
         WHERE te.deleted_at IS NULL
           AND (EXISTS (SELECT 1 FROM tasks t
                        WHERE t.id = te.task_id AND t.deleted_at IS NOT NULL)
             OR EXISTS (SELECT 1 FROM work_orders wo
                        WHERE wo.id = te.work_order_id AND wo.deleted_at IS NOT NULL))
         ORDER BY te.id ASC LIMIT ?1",
        params![limit],
    )
}

/// Run every bucket and bundle the result.
pub fn run(
    pool: &mut DbPool,
    clock: &dyn Clock,
    stale_hours: i64,
    limit: i64,
) -> AppResult<ScanReport> {
    Ok(ScanReport {
        stale_timers: stale_timers(pool, clock, stale_hours, limit)?,
        premature_billing: premature_billing(pool, limit)?,
        post_lock_edits: post_lock_edits(pool, limit)?,
        untracked_done_tasks: untracked_done_tasks(pool, limit)?,
        orphaned_entries: orphaned_entries(pool, limit)?,
    })
}
