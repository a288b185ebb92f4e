use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::scanner;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::time::fmt_ts;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { hours, limit } = cmd {
        let stale_hours = hours.unwrap_or(cfg.stale_timer_hours);
        let limit = limit.unwrap_or(cfg.scan_list_limit);

        let mut pool = DbPool::new(&cfg.database)?;
        let report = scanner::run(&mut pool, &SystemClock, stale_hours, limit)?;

        println!(
            "Stale timers (> {}h): {}",
            stale_hours, report.stale_timers.count
        );
        for e in &report.stale_timers.items {
            println!(
                "  entry #{} worker #{} running since {}",
                e.id,
                e.worker_id,
                fmt_ts(&e.started_at)
            );
        }

        println!("Premature billing: {}", report.premature_billing.count);
        for o in &report.premature_billing.items {
            println!(
                "  order #{} '{}' with {} unapproved entries",
                o.work_order_id, o.code, o.pending_entries
            );
        }

        println!("Post-lock edits: {}", report.post_lock_edits.count);
        for e in &report.post_lock_edits.items {
            println!(
                "  entry #{} ({}) edited: {}",
                e.id,
                e.approval_state.to_db_str(),
                e.edited_reason.as_deref().unwrap_or("-")
            );
        }

        println!(
            "Done tasks with no time: {}",
            report.untracked_done_tasks.count
        );
        for t in &report.untracked_done_tasks.items {
            println!("  task #{} '{}' (order #{})", t.task_id, t.title, t.work_order_id);
        }

        println!("Orphaned entries: {}", report.orphaned_entries.count);
        for e in &report.orphaned_entries.items {
            println!("  entry #{} (task #{})", e.id, e.task_id);
        }

        if report.total_findings() == 0 {
            success("No exceptions found.");
        } else {
            warning(format!("{} findings need review.", report.total_findings()));
        }
    }
    Ok(())
}
