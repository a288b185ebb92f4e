mod common;

use common::{open_pool, seed_shop, setup_test_db, t0};
use shoptrack::core::clock::FixedClock;
use shoptrack::core::{approval, billing, timer};
use shoptrack::models::ApprovalState;
use std::env;
use std::fs;

#[test]
fn billable_summary_counts_only_approved_non_goodwill_time() {
    let db = setup_test_db("billing_summary");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    // Entry 1: 600 s, will be approved.
    timer::start(&mut pool, &clock, seed.mechanic, seed.task1).unwrap();
    clock.advance_secs(600);
    let billable = timer::stop(&mut pool, &clock, seed.mechanic, "done", None, false).unwrap();

    // Entry 2: 300 s of goodwill, also approved but never billed.
    timer::start(&mut pool, &clock, seed.mechanic, seed.task2).unwrap();
    clock.advance_secs(300);
    let goodwill = timer::stop(&mut pool, &clock, seed.mechanic, "goodwill", None, true).unwrap();

    // Entry 3: 400 s left in draft.
    timer::start(&mut pool, &clock, seed.mechanic, seed.task1).unwrap();
    clock.advance_secs(400);
    timer::stop(&mut pool, &clock, seed.mechanic, "draft", None, false).unwrap();

    for id in [billable.id, goodwill.id] {
        approval::transition(&mut pool, &clock, id, seed.manager, ApprovalState::Approved, None)
            .unwrap();
    }

    let summary = billing::billable_summary(&mut pool, seed.order).unwrap();
    assert_eq!(summary.billable_secs, 600);
    assert_eq!(summary.entry_count, 1);

    let entries = billing::billable_entries(&mut pool, seed.order).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, billable.id);
}

#[test]
fn locked_entries_still_bill() {
    let db = setup_test_db("billing_locked");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    timer::start(&mut pool, &clock, seed.mechanic, seed.task1).unwrap();
    clock.advance_secs(1200);
    let entry = timer::stop(&mut pool, &clock, seed.mechanic, "done", None, false).unwrap();

    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Approved, None)
        .unwrap();
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Locked, None)
        .unwrap();

    let summary = billing::billable_summary(&mut pool, seed.order).unwrap();
    assert_eq!(summary.billable_secs, 1200);
}

#[test]
fn csv_export_writes_one_row_per_billable_entry() {
    let db = setup_test_db("billing_csv");
    let mut pool = open_pool(&db);
    let seed = seed_shop(&pool);
    let clock = FixedClock::new(t0());

    timer::start(&mut pool, &clock, seed.mechanic, seed.task1).unwrap();
    clock.advance_secs(900);
    let entry = timer::stop(&mut pool, &clock, seed.mechanic, "done", None, false).unwrap();
    approval::transition(&mut pool, &clock, entry.id, seed.manager, ApprovalState::Approved, None)
        .unwrap();

    let mut out = env::temp_dir();
    out.push("billing_csv_shoptrack_out.csv");
    fs::remove_file(&out).ok();

    let written = billing::export_billable_csv(&mut pool, seed.order, &out).unwrap();
    assert_eq!(written, 1);

    let content = fs::read_to_string(&out).unwrap();
    // Header plus one record.
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("duration_secs"));
    assert!(content.contains("900"));
}
