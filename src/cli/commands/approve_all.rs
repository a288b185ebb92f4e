use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval;
use crate::core::clock::SystemClock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::ApproveAll {
        work_order_id,
        actor_id,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let count = approval::approve_all(&mut pool, &SystemClock, *work_order_id, *actor_id)?;

        if count == 0 {
            info(format!(
                "No eligible entries under work order #{}",
                work_order_id
            ));
        } else {
            success(format!(
                "Approved {} entries under work order #{}",
                count, work_order_id
            ));
        }
    }
    Ok(())
}
