use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::timer;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::fmt_duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop {
        worker_id,
        reason,
        notes,
        goodwill,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let entry = timer::stop(
            &mut pool,
            &SystemClock,
            *worker_id,
            reason,
            notes.as_deref(),
            *goodwill,
        )?;

        success(format!(
            "Timer stopped: entry #{}, {} tracked ({})",
            entry.id,
            fmt_duration(entry.duration_secs.unwrap_or(0)),
            reason
        ));
    }
    Ok(())
}
