//! Approval state machine for completed time entries.
//!
//! The lifecycle is draft → submitted → approved → locked, with a single
//! privileged reverse edge (locked → approved, "unlock for correction").
//! Everything here funnels through [`transition`]; nothing else in the
//! crate mutates `approval_state`.

use crate::core::clock::Clock;
use crate::db::audit::{self, ENTITY_TIME_ENTRY, ENTITY_WORK_ORDER};
use crate::db::pool::DbPool;
use crate::db::queries::{
    self, approvable_entry_ids, get_entry, get_work_order, get_worker,
    insert_work_order_comment, ts_to_db,
};
use crate::errors::{AppError, AppResult};
use crate::models::{ApprovalState, AuditAction, TimeEntry, Worker};
use rusqlite::{Connection, TransactionBehavior, params};
use serde_json::json;

/// Minimum length for unlock and adjustment justifications.
pub const MIN_REASON_LEN: usize = 10;

fn require_reason(reason: Option<&str>) -> AppResult<&str> {
    match reason {
        Some(r) if r.trim().len() >= MIN_REASON_LEN => Ok(r),
        _ => Err(AppError::Validation(format!(
            "a reason of at least {} characters is required",
            MIN_REASON_LEN
        ))),
    }
}

fn require_elevated(actor: &Worker) -> AppResult<()> {
    if actor.role.is_elevated() {
        Ok(())
    } else {
        Err(AppError::Unauthorized(actor.id))
    }
}

/// Move one entry to `target`, enforcing the transition table, lock
/// immutability and the unlock authorization rules.
pub fn transition(
    pool: &mut DbPool,
    clock: &dyn Clock,
    entry_id: i64,
    actor_id: i64,
    target: ApprovalState,
    reason: Option<&str>,
) -> AppResult<TimeEntry> {
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(queries::map_tx_err)?;

    let actor = get_worker(&tx, actor_id)?;
    let entry = get_entry(&tx, entry_id)?;
    let from = entry.approval_state;
    let now = clock.now();

    // The lock is a wall: the only way out is the unlock edge, and any
    // other request against a locked entry is a LockedEntry error, not a
    // generic invalid transition.
    if from.is_locked() {
        if target != ApprovalState::Approved {
            return Err(AppError::LockedEntry(entry_id));
        }

        require_elevated(&actor)?;
        let reason = require_reason(reason)?;

        tx.execute(
            "UPDATE time_entries
             SET approval_state = 'approved', edited_at = ?1, edited_reason = ?2
             WHERE id = ?3",
            params![ts_to_db(&now), reason, entry_id],
        )?;

        let unlocked = get_entry(&tx, entry_id)?;
        audit::record(
            &tx,
            ENTITY_TIME_ENTRY,
            entry_id,
            AuditAction::UnlockForCorrection,
            actor_id,
            Some(&json!({ "approval_state": from, "entry": &entry })),
            Some(&json!({ "approval_state": unlocked.approval_state, "entry": &unlocked })),
            &now,
        )?;

        tx.commit().map_err(queries::map_tx_err)?;
        return Ok(unlocked);
    }

    if !ApprovalState::can_transition(from, target) {
        return Err(AppError::InvalidTransition {
            from: from.to_db_str().into(),
            to: target.to_db_str().into(),
        });
    }

    match target {
        ApprovalState::Submitted => {
            tx.execute(
                "UPDATE time_entries SET approval_state = 'submitted' WHERE id = ?1",
                [entry_id],
            )?;
        }
        ApprovalState::Approved => {
            require_elevated(&actor)?;
            if entry.is_running() {
                return Err(AppError::InvalidState(format!(
                    "time entry {} is still running",
                    entry_id
                )));
            }
            approve_one(&tx, entry_id, actor_id, &now)?;
        }
        ApprovalState::Locked => {
            require_elevated(&actor)?;
            tx.execute(
                "UPDATE time_entries SET approval_state = 'locked' WHERE id = ?1",
                [entry_id],
            )?;
        }
        ApprovalState::Draft => unreachable!("no edge leads back to draft"),
    }

    let updated = get_entry(&tx, entry_id)?;
    audit::record(
        &tx,
        ENTITY_TIME_ENTRY,
        entry_id,
        AuditAction::Transition,
        actor_id,
        Some(&entry),
        Some(&updated),
        &now,
    )?;

    tx.commit().map_err(queries::map_tx_err)?;
    Ok(updated)
}

fn approve_one(
    conn: &Connection,
    entry_id: i64,
    actor_id: i64,
    now: &chrono::DateTime<chrono::Utc>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE time_entries
         SET approval_state = 'approved', approver_id = ?1, approved_at = ?2
         WHERE id = ?3",
        params![actor_id, ts_to_db(now), entry_id],
    )?;
    Ok(())
}

/// Replace the tracked duration of a not-yet-locked entry.
///
/// The adjustment is visible twice: in the audit log and as a plain-text
/// comment on the parent work order, so everyone on the job sees the
/// correction.
pub fn adjust_duration(
    pool: &mut DbPool,
    clock: &dyn Clock,
    entry_id: i64,
    actor_id: i64,
    new_duration_secs: i64,
    reason: &str,
) -> AppResult<TimeEntry> {
    if new_duration_secs <= 0 {
        return Err(AppError::Validation(
            "duration must be a positive number of seconds".into(),
        ));
    }
    let reason = require_reason(Some(reason))?;

    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(queries::map_tx_err)?;

    get_worker(&tx, actor_id)?;
    let entry = get_entry(&tx, entry_id)?;

    if entry.approval_state.is_locked() {
        return Err(AppError::LockedEntry(entry_id));
    }
    if entry.is_running() {
        return Err(AppError::InvalidState(format!(
            "time entry {} is still running",
            entry_id
        )));
    }

    let now = clock.now();

    tx.execute(
        "UPDATE time_entries
         SET duration_secs = ?1, edited_at = ?2, edited_reason = ?3
         WHERE id = ?4",
        params![new_duration_secs, ts_to_db(&now), reason, entry_id],
    )?;

    let updated = get_entry(&tx, entry_id)?;

    let old_min = entry.duration_secs.unwrap_or(0) / 60;
    let new_min = new_duration_secs / 60;
    insert_work_order_comment(
        &tx,
        entry.work_order_id,
        actor_id,
        &format!(
            "Time entry #{} adjusted: {} min -> {} min ({})",
            entry_id, old_min, new_min, reason
        ),
        &now,
    )?;

    audit::record(
        &tx,
        ENTITY_TIME_ENTRY,
        entry_id,
        AuditAction::Adjust,
        actor_id,
        Some(&entry),
        Some(&updated),
        &now,
    )?;

    tx.commit().map_err(queries::map_tx_err)?;
    Ok(updated)
}

/// Soft-delete a time entry. Locked entries must be unlocked first;
/// deleting one that already passed approval takes an elevated role.
pub fn delete_entry(
    pool: &mut DbPool,
    clock: &dyn Clock,
    entry_id: i64,
    actor_id: i64,
) -> AppResult<()> {
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(queries::map_tx_err)?;

    let actor = get_worker(&tx, actor_id)?;
    let entry = get_entry(&tx, entry_id)?;

    if entry.approval_state.is_locked() {
        return Err(AppError::LockedEntry(entry_id));
    }
    if entry.approval_state == ApprovalState::Approved {
        require_elevated(&actor)?;
    }

    let now = clock.now();
    queries::soft_delete_entry(&tx, entry_id, &now)?;

    audit::record(
        &tx,
        ENTITY_TIME_ENTRY,
        entry_id,
        AuditAction::SoftDelete,
        actor_id,
        Some(&entry),
        None::<&TimeEntry>,
        &now,
    )?;

    tx.commit().map_err(queries::map_tx_err)?;
    Ok(())
}

/// Approve every eligible entry under a work order in one transaction.
/// Zero eligible entries is a no-op, not an error.
pub fn approve_all(
    pool: &mut DbPool,
    clock: &dyn Clock,
    work_order_id: i64,
    actor_id: i64,
) -> AppResult<usize> {
    let tx = pool
        .conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(queries::map_tx_err)?;

    let actor = get_worker(&tx, actor_id)?;
    require_elevated(&actor)?;
    get_work_order(&tx, work_order_id)?;

    let now = clock.now();
    let ids = approvable_entry_ids(&tx, work_order_id)?;

    for id in &ids {
        let before = get_entry(&tx, *id)?;
        approve_one(&tx, *id, actor_id, &now)?;
        let after = get_entry(&tx, *id)?;
        audit::record(
            &tx,
            ENTITY_TIME_ENTRY,
            *id,
            AuditAction::Transition,
            actor_id,
            Some(&before),
            Some(&after),
            &now,
        )?;
    }

    if !ids.is_empty() {
        audit::record(
            &tx,
            ENTITY_WORK_ORDER,
            work_order_id,
            AuditAction::Transition,
            actor_id,
            None::<&TimeEntry>,
            Some(&json!({ "approved_entries": &ids })),
            &now,
        )?;
    }

    tx.commit().map_err(queries::map_tx_err)?;
    Ok(ids.len())
}
