use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval;
use crate::core::clock::SystemClock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { entry_id, actor_id } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        approval::delete_entry(&mut pool, &SystemClock, *entry_id, *actor_id)?;

        success(format!("Entry #{} deleted", entry_id));
    }
    Ok(())
}
