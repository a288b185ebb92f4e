use crate::cli::parser::{Commands, OrderAction};
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::db::pool::DbPool;
use crate::db::queries::{insert_work_order, set_work_order_status, soft_delete_work_order};
use crate::errors::{AppError, AppResult};
use crate::models::WorkOrderStatus;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Order { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        match action {
            OrderAction::Add { code, title } => {
                let id = insert_work_order(&pool.conn, code, title)?;
                success(format!("Work order #{} '{}'", id, code));
            }
            OrderAction::Status { id, status } => {
                let status = WorkOrderStatus::from_db_str(status)
                    .ok_or_else(|| AppError::InvalidState(status.clone()))?;
                set_work_order_status(&pool.conn, *id, status)?;
                success(format!("Work order #{} -> {}", id, status));
            }
            OrderAction::Del { id } => {
                soft_delete_work_order(&pool.conn, *id, &SystemClock.now())?;
                success(format!("Work order #{} deleted", id));
            }
        }
    }
    Ok(())
}
