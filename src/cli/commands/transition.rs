use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval;
use crate::core::clock::SystemClock;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::ApprovalState;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Transition {
        entry_id,
        actor_id,
        target,
        reason,
    } = cmd
    {
        let target = ApprovalState::from_db_str(target)
            .ok_or_else(|| AppError::InvalidApprovalState(target.clone()))?;

        let mut pool = DbPool::new(&cfg.database)?;

        let entry = approval::transition(
            &mut pool,
            &SystemClock,
            *entry_id,
            *actor_id,
            target,
            reason.as_deref(),
        )?;

        success(format!(
            "Entry #{} is now {}",
            entry.id,
            entry.approval_state.to_db_str()
        ));
    }
    Ok(())
}
