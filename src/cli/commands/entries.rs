use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::entries_for_work_order;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::fmt_duration;
use crate::utils::table::print_table;
use crate::utils::time::{fmt_opt_ts, fmt_ts};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Entries { work_order_id } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let entries = entries_for_work_order(&pool.conn, *work_order_id)?;

        if entries.is_empty() {
            info(format!("No entries for work order #{}", work_order_id));
            return Ok(());
        }

        let mut rows = vec![vec![
            "id".to_string(),
            "worker".to_string(),
            "task".to_string(),
            "started".to_string(),
            "ended".to_string(),
            "duration".to_string(),
            "state".to_string(),
            "goodwill".to_string(),
        ]];

        for e in &entries {
            rows.push(vec![
                e.id.to_string(),
                e.worker_id.to_string(),
                e.task_id.to_string(),
                fmt_ts(&e.started_at),
                fmt_opt_ts(&e.ended_at),
                e.duration_secs.map(fmt_duration).unwrap_or_else(|| "--".into()),
                e.approval_state.to_db_str().to_string(),
                if e.goodwill { "yes" } else { "no" }.to_string(),
            ]);
        }

        print_table(&rows);
    }
    Ok(())
}
