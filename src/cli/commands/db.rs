use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{check_integrity, current_version, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db { migrate, check, info } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        if *migrate {
            run_pending_migrations(&pool.conn)?;
            success("Migrations up to date.");
        }

        if *check {
            if check_integrity(&pool.conn)? {
                success("Database integrity OK.");
            } else {
                warning("Database integrity check FAILED.");
                return Err(AppError::Migration("integrity check failed".into()));
            }
        }

        if *info {
            print_info(&mut pool, &cfg.database)?;
        }
    }
    Ok(())
}

fn print_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    let version = current_version(&pool.conn)?;
    println!("• File: {}", db_path);
    println!("• Schema version: {}", version);

    for table in ["workers", "work_orders", "tasks", "time_entries", "audit_log"] {
        let count: i64 =
            pool.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        println!("• {}: {} rows", table, count);
    }
    Ok(())
}
