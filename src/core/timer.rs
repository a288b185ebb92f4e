//! Timer controller: start, stop and the switch between tasks.
//!
//! Each operation runs as one IMMEDIATE transaction. Exclusivity ("at most
//! one running timer per worker") is not enforced here: it lives in the
//! partial unique index created by the migration engine, so it holds across
//! processes. This module only reacts to that index firing.

use crate::core::clock::{Clock, elapsed_secs};
use crate::db::audit::{self, ENTITY_TIME_ENTRY};
use crate::db::pool::DbPool;
use crate::db::queries::{
    self, close_entry, get_entry, get_task, get_work_order, get_worker, insert_running_entry,
    running_entry_for_worker, set_work_order_status,
};
use crate::errors::{AppError, AppResult};
use crate::models::{AuditAction, TimeEntry, WorkOrderStatus};
use rusqlite::TransactionBehavior;
use serde_json::json;

/// Reason stamped on an entry closed implicitly by a switch.
pub const SWITCH_STOP_REASON: &str = "switched to new task";

/// Result of a start request. `already_running` distinguishes the
/// idempotent outcome (the worker's timer was already on this task, or a
/// concurrent start won the race) from a genuinely new entry.
#[derive(Debug)]
pub struct StartOutcome {
    pub entry: TimeEntry,
    pub already_running: bool,
}

/// Start a timer for `worker_id` on `task_id`, auto-stopping any running
/// entry first.
pub fn start(
    pool: &mut DbPool,
    clock: &dyn Clock,
    worker_id: i64,
    task_id: i64,
) -> AppResult<StartOutcome> {
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(queries::map_tx_err)?;

    let worker = get_worker(&tx, worker_id)?;

    let task = get_task(&tx, task_id)?;
    if task.assigned_worker_id != worker.id {
        // Not assigned reads the same as missing to the caller.
        return Err(AppError::NotFound("task", task_id));
    }
    if task.done {
        return Err(AppError::InvalidState(format!(
            "task {} is already done",
            task_id
        )));
    }

    let now = clock.now();

    // 1. Auto-stop a running entry, unless it is already on this task
    //    (duplicate retry: return it untouched).
    let mut replaced_id: Option<i64> = None;
    if let Some(prev) = running_entry_for_worker(&tx, worker_id)? {
        if prev.task_id == task_id {
            return Ok(StartOutcome {
                entry: prev,
                already_running: true,
            });
        }

        let duration = elapsed_secs(&prev.started_at, &now);
        close_entry(
            &tx,
            prev.id,
            &now,
            duration,
            SWITCH_STOP_REASON,
            None,
            prev.goodwill,
        )?;
        let closed = get_entry(&tx, prev.id)?;
        audit::record(
            &tx,
            ENTITY_TIME_ENTRY,
            prev.id,
            AuditAction::AutoStop,
            worker_id,
            Some(&prev),
            Some(&json!({ "entry": closed, "reason": SWITCH_STOP_REASON })),
            &now,
        )?;
        replaced_id = Some(prev.id);
    }

    // 2. Create the new draft entry. A unique violation here means a
    //    concurrent start for the same worker won the race: re-read the
    //    winner and answer idempotently instead of failing the caller.
    let entry_id = match insert_running_entry(&tx, worker_id, task_id, task.work_order_id, &now) {
        Ok(id) => id,
        Err(e) if queries::is_unique_violation(&e) => {
            let winner = running_entry_for_worker(&tx, worker_id)?.ok_or_else(|| {
                AppError::Conflict("running entry vanished while resolving start race".into())
            })?;
            tx.commit().map_err(queries::map_tx_err)?;
            return Ok(StartOutcome {
                entry: winner,
                already_running: true,
            });
        }
        Err(e) => return Err(queries::map_tx_err(e)),
    };

    let entry = get_entry(&tx, entry_id)?;
    audit::record(
        &tx,
        ENTITY_TIME_ENTRY,
        entry_id,
        AuditAction::Start,
        worker_id,
        None::<&TimeEntry>,
        Some(&json!({ "entry": &entry, "replaced_entry_id": replaced_id })),
        &now,
    )?;

    // 3. First tracked minute moves the order out of "not started".
    let order = get_work_order(&tx, task.work_order_id)?;
    if order.status == WorkOrderStatus::NotStarted {
        set_work_order_status(&tx, order.id, WorkOrderStatus::InProgress)?;
    }

    tx.commit().map_err(queries::map_tx_err)?;

    Ok(StartOutcome {
        entry,
        already_running: false,
    })
}

/// Stop the worker's running timer.
pub fn stop(
    pool: &mut DbPool,
    clock: &dyn Clock,
    worker_id: i64,
    stop_reason: &str,
    notes: Option<&str>,
    goodwill: bool,
) -> AppResult<TimeEntry> {
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(queries::map_tx_err)?;

    get_worker(&tx, worker_id)?;

    let running = running_entry_for_worker(&tx, worker_id)?
        .ok_or_else(|| AppError::InvalidState("nothing to stop".into()))?;

    let now = clock.now();
    let duration = elapsed_secs(&running.started_at, &now);

    close_entry(&tx, running.id, &now, duration, stop_reason, notes, goodwill)?;
    let stopped = get_entry(&tx, running.id)?;

    audit::record(
        &tx,
        ENTITY_TIME_ENTRY,
        running.id,
        AuditAction::Stop,
        worker_id,
        Some(&running),
        Some(&stopped),
        &now,
    )?;

    tx.commit().map_err(queries::map_tx_err)?;

    Ok(stopped)
}
