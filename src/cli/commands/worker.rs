use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::insert_worker;
use crate::errors::{AppError, AppResult};
use crate::models::Role;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Worker { name, role } = cmd {
        let role = Role::from_db_str(role).ok_or_else(|| AppError::InvalidRole(role.clone()))?;

        let pool = DbPool::new(&cfg.database)?;
        let id = insert_worker(&pool.conn, name, role)?;

        success(format!("Worker #{} '{}' ({})", id, name, role.to_db_str()));
    }
    Ok(())
}
