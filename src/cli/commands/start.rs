use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::timer;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time::fmt_ts;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start { worker_id, task_id } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        let outcome = timer::start(&mut pool, &SystemClock, *worker_id, *task_id)?;

        if outcome.already_running {
            info(format!(
                "Timer already running: entry #{} on task #{} since {}",
                outcome.entry.id,
                outcome.entry.task_id,
                fmt_ts(&outcome.entry.started_at)
            ));
        } else {
            success(format!(
                "Timer started: entry #{} on task #{} at {}",
                outcome.entry.id,
                outcome.entry.task_id,
                fmt_ts(&outcome.entry.started_at)
            ));
        }
    }
    Ok(())
}
