use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_cli_db, setup_test_db, st};

#[test]
fn test_start_stop_cycle() {
    let db_path = setup_test_db("cli_start_stop");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"])
        .assert()
        .success()
        .stdout(contains("Timer started"));

    st().args(["--db", &db_path, "status", "1"])
        .assert()
        .success()
        .stdout(contains("is on task #1"));

    st().args(["--db", &db_path, "stop", "1", "--reason", "Break/Lunch"])
        .assert()
        .success()
        .stdout(contains("Timer stopped").and(contains("Break/Lunch")));

    st().args(["--db", &db_path, "status", "1"])
        .assert()
        .success()
        .stdout(contains("no running timer"));
}

#[test]
fn test_duplicate_start_is_reported_as_already_running() {
    let db_path = setup_test_db("cli_dup_start");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"])
        .assert()
        .success()
        .stdout(contains("Timer started"));

    st().args(["--db", &db_path, "start", "1", "1"])
        .assert()
        .success()
        .stdout(contains("already running"));
}

#[test]
fn test_switch_keeps_a_single_running_timer() {
    let db_path = setup_test_db("cli_switch");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"])
        .assert()
        .success();

    st().args(["--db", &db_path, "start", "1", "2"])
        .assert()
        .success()
        .stdout(contains("Timer started"));

    st().args(["--db", &db_path, "status", "1"])
        .assert()
        .success()
        .stdout(contains("is on task #2"));

    st().args(["--db", &db_path, "entries", "1"])
        .assert()
        .success()
        .stdout(contains("switched to new task").or(contains("draft")));
}

#[test]
fn test_stop_without_running_timer_fails() {
    let db_path = setup_test_db("cli_stop_none");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "stop", "1", "--reason", "done"])
        .assert()
        .failure()
        .stderr(contains("nothing to stop"));
}

#[test]
fn test_bulk_approve_then_lock_and_adjust_rejection() {
    let db_path = setup_test_db("cli_approval");
    init_cli_db(&db_path);

    // Two finished entries via switch + stop.
    st().args(["--db", &db_path, "start", "1", "1"]).assert().success();
    st().args(["--db", &db_path, "start", "1", "2"]).assert().success();
    st().args(["--db", &db_path, "stop", "1", "--reason", "Break/Lunch"])
        .assert()
        .success();

    st().args(["--db", &db_path, "approve-all", "1", "2"])
        .assert()
        .success()
        .stdout(contains("Approved 2 entries"));

    // Second run is a no-op.
    st().args(["--db", &db_path, "approve-all", "1", "2"])
        .assert()
        .success()
        .stdout(contains("No eligible entries"));

    st().args(["--db", &db_path, "transition", "1", "2", "locked"])
        .assert()
        .success()
        .stdout(contains("now locked"));

    st().args([
        "--db", &db_path, "adjust", "1", "2", "100", "--reason", "fixing a typo in hours",
    ])
    .assert()
    .failure()
    .stderr(contains("locked"));

    st().args([
        "--db",
        &db_path,
        "transition",
        "1",
        "2",
        "approved",
        "--reason",
        "found entry error, recalculated hours",
    ])
    .assert()
    .success()
    .stdout(contains("now approved"));
}

#[test]
fn test_unlock_requires_a_long_enough_reason() {
    let db_path = setup_test_db("cli_unlock_reason");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"]).assert().success();
    st().args(["--db", &db_path, "stop", "1", "--reason", "done"])
        .assert()
        .success();
    st().args(["--db", &db_path, "approve-all", "1", "2"]).assert().success();
    st().args(["--db", &db_path, "transition", "1", "2", "locked"])
        .assert()
        .success();

    st().args([
        "--db", &db_path, "transition", "1", "2", "approved", "--reason", "too short",
    ])
    .assert()
    .failure()
    .stderr(contains("at least 10 characters"));
}

#[test]
fn test_mechanic_cannot_approve() {
    let db_path = setup_test_db("cli_unauthorized");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"]).assert().success();
    st().args(["--db", &db_path, "stop", "1", "--reason", "done"])
        .assert()
        .success();

    st().args(["--db", &db_path, "transition", "1", "1", "approved"])
        .assert()
        .failure()
        .stderr(contains("not allowed"));
}

#[test]
fn test_scan_reports_untracked_done_task() {
    let db_path = setup_test_db("cli_scan");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "task", "done", "2"]).assert().success();

    st().args(["--db", &db_path, "scan"])
        .assert()
        .success()
        .stdout(contains("Done tasks with no time: 1"))
        .stdout(contains("Stale timers"))
        .stdout(contains("Orphaned entries: 0"));
}

#[test]
fn test_goodwill_time_is_not_billable() {
    let db_path = setup_test_db("cli_goodwill");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"]).assert().success();
    st().args(["--db", &db_path, "stop", "1", "--reason", "done", "--goodwill"])
        .assert()
        .success();
    st().args(["--db", &db_path, "approve-all", "1", "2"]).assert().success();

    st().args(["--db", &db_path, "billable", "1"])
        .assert()
        .success()
        .stdout(contains("0 entries"));
}

#[test]
fn test_deleted_entry_disappears_from_listings() {
    let db_path = setup_test_db("cli_del");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"]).assert().success();
    st().args(["--db", &db_path, "stop", "1", "--reason", "done"])
        .assert()
        .success();

    st().args(["--db", &db_path, "del", "1", "1"])
        .assert()
        .success()
        .stdout(contains("Entry #1 deleted"));

    st().args(["--db", &db_path, "entries", "1"])
        .assert()
        .success()
        .stdout(contains("No entries"));
}

#[test]
fn test_audit_trail_is_printed() {
    let db_path = setup_test_db("cli_audit");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "1"]).assert().success();
    st().args(["--db", &db_path, "stop", "1", "--reason", "done"])
        .assert()
        .success();

    st().args(["--db", &db_path, "audit"])
        .assert()
        .success()
        .stdout(contains("START"))
        .stdout(contains("STOP"));
}

#[test]
fn test_db_maintenance_commands() {
    let db_path = setup_test_db("cli_db");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "db", "--migrate", "--check", "--info"])
        .assert()
        .success()
        .stdout(contains("Schema version: 2"))
        .stdout(contains("time_entries"));
}

#[test]
fn test_start_validation_errors() {
    let db_path = setup_test_db("cli_start_errors");
    init_cli_db(&db_path);

    st().args(["--db", &db_path, "start", "1", "99"])
        .assert()
        .failure()
        .stderr(contains("not found"));

    st().args(["--db", &db_path, "task", "done", "1"]).assert().success();
    st().args(["--db", &db_path, "start", "1", "1"])
        .assert()
        .failure()
        .stderr(contains("already done"));
}
