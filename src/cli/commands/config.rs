use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config, reset } = cmd {
        if *reset {
            Config::default().save()?;
            success(format!(
                "Wrote default configuration to {}",
                Config::config_file().display()
            ));
            return Ok(());
        }

        if *print_config {
            let yaml = serde_yaml::to_string(cfg)
                .map_err(|e| AppError::Config(format!("serialize config: {}", e)))?;
            print!("{}", yaml);
            return Ok(());
        }

        println!("Use --print or --reset.");
    }
    Ok(())
}
