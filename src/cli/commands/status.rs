use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::running_entry_for_worker;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::fmt_ts;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { worker_id } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        match running_entry_for_worker(&pool.conn, *worker_id)? {
            Some(entry) => info(format!(
                "Worker #{} is on task #{} (entry #{}) since {}",
                worker_id,
                entry.task_id,
                entry.id,
                fmt_ts(&entry.started_at)
            )),
            None => info(format!("Worker #{} has no running timer", worker_id)),
        }
    }
    Ok(())
}
