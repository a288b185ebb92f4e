#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, TimeZone, Utc};
use shoptrack::db::initialize::init_db;
use shoptrack::db::pool::DbPool;
use shoptrack::db::queries::{insert_task, insert_work_order, insert_worker};
use shoptrack::models::Role;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn st() -> Command {
    cargo_bin_cmd!("shoptrack")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shoptrack.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Open (and initialize) a pool directly through the library API.
pub fn open_pool(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// Ids of the rows created by [`seed_shop`].
pub struct Seed {
    pub mechanic: i64,
    pub manager: i64,
    pub order: i64,
    pub task1: i64,
    pub task2: i64,
}

/// One mechanic, one manager, one order with two tasks assigned to the mechanic.
pub fn seed_shop(pool: &DbPool) -> Seed {
    let mechanic = insert_worker(&pool.conn, "Jo Fields", Role::Mechanic).expect("worker");
    let manager = insert_worker(&pool.conn, "Sam Ortiz", Role::Manager).expect("worker");
    let order = insert_work_order(&pool.conn, "WO-1001", "Brake service").expect("order");
    let task1 = insert_task(&pool.conn, order, "Replace pads", mechanic).expect("task");
    let task2 = insert_task(&pool.conn, order, "Bleed lines", mechanic).expect("task");

    Seed {
        mechanic,
        manager,
        order,
        task1,
        task2,
    }
}

/// A fixed instant far from now, so staleness tests are deterministic.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

/// Initialize a DB through the CLI and seed it with the same fixture as
/// [`seed_shop`], for the end-to-end command tests.
pub fn init_cli_db(db_path: &str) {
    st().args(["--db", db_path, "--test", "init"]).assert().success();

    st().args(["--db", db_path, "worker", "Jo Fields", "--role", "mechanic"])
        .assert()
        .success();
    st().args(["--db", db_path, "worker", "Sam Ortiz", "--role", "manager"])
        .assert()
        .success();
    st().args(["--db", db_path, "order", "add", "WO-1001", "--title", "Brake service"])
        .assert()
        .success();
    st().args(["--db", db_path, "task", "add", "1", "1", "--title", "Replace pads"])
        .assert()
        .success();
    st().args(["--db", db_path, "task", "add", "1", "1", "--title", "Bleed lines"])
        .assert()
        .success();
}
