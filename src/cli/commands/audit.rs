use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::print_table;
use crate::utils::time::fmt_ts;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Audit { entity, id, limit } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        let rows = audit::list(
            &pool.conn,
            entity.as_deref(),
            *id,
            limit.unwrap_or(cfg.audit_list_limit),
        )?;

        if rows.is_empty() {
            info("Audit log is empty for this filter.");
            return Ok(());
        }

        let mut table = vec![vec![
            "id".to_string(),
            "when".to_string(),
            "action".to_string(),
            "entity".to_string(),
            "actor".to_string(),
        ]];

        for r in &rows {
            table.push(vec![
                r.id.to_string(),
                fmt_ts(&r.created_at),
                r.action.to_db_str().to_string(),
                format!("{}#{}", r.entity_type, r.entity_id),
                format!("#{}", r.actor_id),
            ]);
        }

        print_table(&table);
    }
    Ok(())
}
