//! Versioned schema migration engine.
//!
//! Each migration is a numbered step recorded in `schema_migrations`;
//! `run_pending_migrations` applies the missing ones in order, each inside
//! its own transaction.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "base schema",
        sql: r#"
        CREATE TABLE IF NOT EXISTS workers (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'mechanic'
                        CHECK(role IN ('mechanic','manager','admin')),
            deleted_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS work_orders (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            code        TEXT NOT NULL UNIQUE,
            title       TEXT NOT NULL DEFAULT '',
            status      TEXT NOT NULL DEFAULT 'not_started'
                        CHECK(status IN ('not_started','in_progress','ready_to_bill','billed')),
            deleted_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            work_order_id       INTEGER NOT NULL REFERENCES work_orders(id),
            title               TEXT NOT NULL DEFAULT '',
            assigned_worker_id  INTEGER NOT NULL REFERENCES workers(id),
            done                INTEGER NOT NULL DEFAULT 0,
            deleted_at          TEXT
        );

        CREATE TABLE IF NOT EXISTS time_entries (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id       INTEGER NOT NULL REFERENCES workers(id),
            task_id         INTEGER NOT NULL REFERENCES tasks(id),
            work_order_id   INTEGER NOT NULL REFERENCES work_orders(id),
            started_at      TEXT NOT NULL,
            ended_at        TEXT,
            duration_secs   INTEGER,
            notes           TEXT NOT NULL DEFAULT '',
            stop_reason     TEXT,
            goodwill        INTEGER NOT NULL DEFAULT 0,
            edited_at       TEXT,
            edited_reason   TEXT,
            approval_state  TEXT NOT NULL DEFAULT 'draft'
                            CHECK(approval_state IN ('draft','submitted','approved','locked')),
            approver_id     INTEGER REFERENCES workers(id),
            approved_at     TEXT,
            deleted_at      TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_work_order ON time_entries(work_order_id);
        CREATE INDEX IF NOT EXISTS idx_entries_task ON time_entries(task_id);
        CREATE INDEX IF NOT EXISTS idx_entries_state ON time_entries(approval_state);

        CREATE TABLE IF NOT EXISTS audit_log (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_type  TEXT NOT NULL,
            entity_id    INTEGER NOT NULL,
            action       TEXT NOT NULL,
            actor_id     INTEGER NOT NULL,
            before_json  TEXT,
            after_json   TEXT,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS work_order_comments (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            work_order_id  INTEGER NOT NULL REFERENCES work_orders(id),
            author_id      INTEGER NOT NULL REFERENCES workers(id),
            body           TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: 2,
        name: "single running timer per worker",
        // The exclusivity invariant lives here, at the storage layer, so it
        // holds across processes and service instances.
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_one_running_per_worker
            ON time_entries(worker_id)
            WHERE ended_at IS NULL AND deleted_at IS NULL;
        "#,
    },
];

fn ensure_migrations_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            applied_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Highest applied migration version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT IFNULL(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
}

/// Apply every migration newer than the recorded version, in order.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_migrations_table(conn)?;

    let applied = current_version(conn)?;

    for m in MIGRATIONS {
        if m.version <= applied {
            continue;
        }

        conn.execute_batch("BEGIN;")
            .map_err(|e| AppError::Migration(format!("begin v{}: {}", m.version, e)))?;

        let step = conn.execute_batch(m.sql).and_then(|_| {
            conn.execute(
                "INSERT INTO schema_migrations (version, name, applied_at)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![m.version, m.name, chrono::Utc::now().to_rfc3339()],
            )
            .map(|_| ())
        });

        match step {
            Ok(()) => {
                conn.execute_batch("COMMIT;")
                    .map_err(|e| AppError::Migration(format!("commit v{}: {}", m.version, e)))?;
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK;").ok();
                return Err(AppError::Migration(format!(
                    "migration v{} ({}) failed: {}",
                    m.version, m.name, e
                )));
            }
        }
    }

    Ok(())
}

/// `PRAGMA integrity_check` wrapper for the `db --check` command.
pub fn check_integrity(conn: &Connection) -> AppResult<bool> {
    let result: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    Ok(result == "ok")
}
