use crate::cli::parser::{Commands, TaskAction};
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::db::pool::DbPool;
use crate::db::queries::{insert_task, mark_task_done, soft_delete_task};
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Task { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        match action {
            TaskAction::Add {
                work_order_id,
                worker_id,
                title,
            } => {
                let id = insert_task(&pool.conn, *work_order_id, title, *worker_id)?;
                success(format!(
                    "Task #{} on order #{} (worker #{})",
                    id, work_order_id, worker_id
                ));
            }
            TaskAction::Done { id } => {
                mark_task_done(&pool.conn, *id)?;
                success(format!("Task #{} marked done", id));
            }
            TaskAction::Del { id } => {
                soft_delete_task(&pool.conn, *id, &SystemClock.now())?;
                success(format!("Task #{} deleted", id));
            }
        }
    }
    Ok(())
}
