use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

/// Create the database schema (and the config file on first run).
pub fn handle(cfg: &Config, test_mode: bool) -> AppResult<()> {
    if !test_mode && !Config::config_file().exists() {
        cfg.save()?;
        success(format!(
            "Created configuration at {}",
            Config::config_file().display()
        ));
    }

    if let Some(parent) = Path::new(&cfg.database).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    success(format!("Database initialized at {}", cfg.database));
    Ok(())
}
