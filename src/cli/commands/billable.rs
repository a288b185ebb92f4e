use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::billing;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::fmt_duration;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Billable { work_order_id, csv } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        let summary = billing::billable_summary(&mut pool, *work_order_id)?;
        println!(
            "Work order #{}: {} billable across {} entries",
            summary.work_order_id,
            fmt_duration(summary.billable_secs),
            summary.entry_count
        );

        if let Some(path) = csv {
            let written = billing::export_billable_csv(&mut pool, *work_order_id, Path::new(path))?;
            success(format!("Wrote {} entries to {}", written, path));
        }
    }
    Ok(())
}
