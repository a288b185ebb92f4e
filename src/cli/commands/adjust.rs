use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval;
use crate::core::clock::SystemClock;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::fmt_duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Adjust {
        entry_id,
        actor_id,
        new_duration_secs,
        reason,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let entry = approval::adjust_duration(
            &mut pool,
            &SystemClock,
            *entry_id,
            *actor_id,
            *new_duration_secs,
            reason,
        )?;

        success(format!(
            "Entry #{} duration set to {}",
            entry.id,
            fmt_duration(entry.duration_secs.unwrap_or(0))
        ));
    }
    Ok(())
}
