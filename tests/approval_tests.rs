mod common;

use common::{open_pool, seed_shop, setup_test_db, t0, Seed};
use shoptrack::core::approval;
use shoptrack::core::clock::FixedClock;
use shoptrack::core::timer;
use shoptrack::db::audit;
use shoptrack::db::pool::DbPool;
use shoptrack::db::queries::get_entry;
use shoptrack::errors::AppError;
use shoptrack::models::{ApprovalState, AuditAction, TimeEntry};

/// Start and stop a timer so there is a finished draft entry to work on.
fn tracked_entry(pool: &mut DbPool, clock: &FixedClock, seed: &Seed, secs: i64) -> TimeEntry {
    timer::start(pool, clock, seed.mechanic, seed.task1).unwrap();
    clock.advance_secs(secs);
    timer::stop(pool, clock, seed.mechanic, "done", None, false).unwrap()
}

#[test]
fn draft_to_locked_walks_every_edge() {
    let db = setup_test_db("approval_flow");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 600);

    let entry = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.mechanic,
        ApprovalState::Submitted,
        None,
    )
    .unwrap();
    assert_eq!(entry.approval_state, ApprovalState::Submitted);

    let entry = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Approved,
        None,
    )
    .unwrap();
    assert_eq!(entry.approval_state, ApprovalState::Approved);
    assert_eq!(entry.approver_id, Some(seed.manager));
    assert!(entry.approved_at.is_some());

    let entry = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Locked,
        None,
    )
    .unwrap();
    assert_eq!(entry.approval_state, ApprovalState::Locked);
}

#[test]
fn draft_cannot_jump_straight_to_locked() {
    let db = setup_test_db("approval_jump");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 60);

    let err = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Locked,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    assert_eq!(
        get_entry(&pool.conn, entry.id).unwrap().approval_state,
        ApprovalState::Draft
    );
}

#[test]
fn mechanic_cannot_approve_or_lock() {
    let db = setup_test_db("approval_role");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 60);

    let err = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.mechanic,
        ApprovalState::Approved,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn running_entry_cannot_be_approved() {
    let db = setup_test_db("approval_running");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let outcome = timer::start(&mut pool, &clock, seed.mechanic, seed.task1).unwrap();

    let err = approval::transition(
        &mut pool,
        &clock,
        outcome.entry.id,
        seed.manager,
        ApprovalState::Approved,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[test]
fn locked_entry_is_immutable_outside_the_unlock_path() {
    let db = setup_test_db("approval_locked");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 600);
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Approved, None)
        .unwrap();
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Locked, None)
        .unwrap();

    let before = get_entry(&pool.conn, entry.id).unwrap();

    let err = approval::adjust_duration(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        100,
        "fixing typo in hours",
    )
    .unwrap_err();
    assert!(matches!(err, AppError::LockedEntry(_)));

    let err = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Submitted,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::LockedEntry(_)));

    // Rejected mutations must leave the row untouched.
    let after = get_entry(&pool.conn, entry.id).unwrap();
    assert_eq!(before, after);
}

#[test]
fn unlock_round_trip_requires_reason_and_authority() {
    let db = setup_test_db("approval_unlock");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 600);
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Approved, None)
        .unwrap();
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Locked, None)
        .unwrap();

    // Nine characters is not enough.
    let err = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Approved,
        Some("too short"),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(
        get_entry(&pool.conn, entry.id).unwrap().approval_state,
        ApprovalState::Locked
    );

    // Mechanics cannot unlock at all.
    let err = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.mechanic,
        ApprovalState::Approved,
        Some("found entry error, recalculated hours"),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let unlocked = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Approved,
        Some("found entry error, recalculated hours"),
    )
    .unwrap();
    assert_eq!(unlocked.approval_state, ApprovalState::Approved);
    assert_eq!(
        unlocked.edited_reason.as_deref(),
        Some("found entry error, recalculated hours")
    );
    assert!(unlocked.edited_at.is_some());

    // And it can be locked again.
    let relocked = approval::transition(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        ApprovalState::Locked,
        None,
    )
    .unwrap();
    assert_eq!(relocked.approval_state, ApprovalState::Locked);
}

#[test]
fn adjust_duration_validates_and_comments_the_work_order() {
    let db = setup_test_db("approval_adjust");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 1800);

    let err =
        approval::adjust_duration(&mut pool, &clock, entry.id, seed.manager, 0, "long enough text")
            .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err =
        approval::adjust_duration(&mut pool, &clock, entry.id, seed.manager, 3600, "short")
            .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let adjusted = approval::adjust_duration(
        &mut pool,
        &clock,
        entry.id,
        seed.manager,
        3600,
        "customer approved extra hour",
    )
    .unwrap();
    assert_eq!(adjusted.duration_secs, Some(3600));
    assert_eq!(adjusted.approval_state, ApprovalState::Draft);
    assert!(adjusted.edited_at.is_some());

    let comment: String = pool
        .conn
        .query_row(
            "SELECT body FROM work_order_comments WHERE work_order_id = ?1",
            [seed.order],
            |row| row.get(0),
        )
        .unwrap();
    assert!(comment.contains("30 min -> 60 min"));
    assert!(comment.contains("customer approved extra hour"));
}

#[test]
fn delete_entry_soft_deletes_and_audits() {
    let db = setup_test_db("approval_delete");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 300);

    approval::delete_entry(&mut pool, &clock, entry.id, seed.mechanic).unwrap();

    let err = get_entry(&pool.conn, entry.id).unwrap_err();
    assert!(matches!(err, AppError::NotFound("time entry", _)));

    let rows = audit::list(&pool.conn, Some("time_entry"), Some(entry.id), 10).unwrap();
    assert_eq!(rows[0].action, AuditAction::SoftDelete);
    assert!(rows[0].before_json.is_some());
    assert!(rows[0].after_json.is_none());
}

#[test]
fn delete_entry_respects_lock_and_approval() {
    let db = setup_test_db("approval_delete_guard");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    let entry = tracked_entry(&mut pool, &clock, &seed, 300);
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Approved, None)
        .unwrap();

    // Past approval, a mechanic can no longer delete.
    let err = approval::delete_entry(&mut pool, &clock, entry.id, seed.mechanic).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Locked, None)
        .unwrap();

    let err = approval::delete_entry(&mut pool, &clock, entry.id, seed.manager).unwrap_err();
    assert!(matches!(err, AppError::LockedEntry(_)));
    assert!(get_entry(&pool.conn, entry.id).is_ok());
}

#[test]
fn bulk_approve_covers_eligible_entries_only() {
    let db = setup_test_db("approval_bulk");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    // E1 via switch, E2 via stop: both finished drafts.
    timer::start(&mut pool, &clock, seed.mechanic, seed.task1).unwrap();
    clock.advance_secs(120);
    timer::start(&mut pool, &clock, seed.mechanic, seed.task2).unwrap();
    clock.advance_secs(120);
    timer::stop(&mut pool, &clock, seed.mechanic, "Break/Lunch", None, false).unwrap();

    let count = approval::approve_all(&mut pool, &clock, seed.order, seed.manager).unwrap();
    assert_eq!(count, 2);

    for entry in shoptrack::db::queries::entries_for_work_order(&pool.conn, seed.order).unwrap() {
        assert_eq!(entry.approval_state, ApprovalState::Approved);
        assert_eq!(entry.approver_id, Some(seed.manager));
    }

    // Nothing left to approve: a no-op, not an error.
    let count = approval::approve_all(&mut pool, &clock, seed.order, seed.manager).unwrap();
    assert_eq!(count, 0);

    let err = approval::approve_all(&mut pool, &clock, 999, seed.manager).unwrap_err();
    assert!(matches!(err, AppError::NotFound("work order", 999)));

    let err = approval::approve_all(&mut pool, &clock, seed.order, seed.mechanic).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}
