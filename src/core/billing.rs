//! Billable rollup over a work order.
//!
//! Billing collaborators must only ever count entries that are approved or
//! locked and not flagged goodwill; this module is the single place that
//! filter is written down.

use crate::db::pool::DbPool;
use crate::db::queries::map_entry_row;
use crate::errors::AppResult;
use crate::models::TimeEntry;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct BillableSummary {
    pub work_order_id: i64,
    pub billable_secs: i64,
    pub entry_count: i64,
}

/// Sum of billable seconds under one work order.
pub fn billable_summary(pool: &mut DbPool, work_order_id: i64) -> AppResult<BillableSummary> {
    let (billable_secs, entry_count): (i64, i64) = pool.conn.query_row(
        "SELECT IFNULL(SUM(duration_secs), 0), COUNT(*)
         FROM time_entries
         WHERE work_order_id = ?1
           AND deleted_at IS NULL
           AND goodwill = 0
           AND approval_state IN ('approved','locked')
           AND duration_secs IS NOT NULL",
        [work_order_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(BillableSummary {
        work_order_id,
        billable_secs,
        entry_count,
    })
}

/// The billable entries themselves, oldest first.
pub fn billable_entries(pool: &mut DbPool, work_order_id: i64) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = pool.conn.prepare(
        "SELECT * FROM time_entries
         WHERE work_order_id = ?1
           AND deleted_at IS NULL
           AND goodwill = 0
           AND approval_state IN ('approved','locked')
           AND duration_secs IS NOT NULL
         ORDER BY started_at ASC",
    )?;

    let rows = stmt.query_map([work_order_id], map_entry_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
struct BillableRow<'a> {
    entry_id: i64,
    worker_id: i64,
    task_id: i64,
    started_at: String,
    ended_at: String,
    duration_secs: i64,
    approval_state: &'a str,
    notes: &'a str,
}

/// Write the billable entries of a work order to a CSV file.
pub fn export_billable_csv(
    pool: &mut DbPool,
    work_order_id: i64,
    path: &Path,
) -> AppResult<usize> {
    let entries = billable_entries(pool, work_order_id)?;

    let mut wtr = csv::Writer::from_path(path)?;

    for e in &entries {
        wtr.serialize(BillableRow {
            entry_id: e.id,
            worker_id: e.worker_id,
            task_id: e.task_id,
            started_at: e.started_at.to_rfc3339(),
            ended_at: e.ended_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            duration_secs: e.duration_secs.unwrap_or(0),
            approval_state: e.approval_state.to_db_str(),
            notes: &e.notes,
        })?;
    }

    wtr.flush()?;
    Ok(entries.len())
}
