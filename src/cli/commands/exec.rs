use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::{ConnectOptions, Database};
use crate::errors::AppResult;
use crate::ui::messages;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Exec { sql, file } = cmd {
        let script = match (sql, file) {
            (Some(sql), _) => sql.clone(),
            (None, Some(path)) => fs::read_to_string(path)?,
            (None, None) => String::new(),
        };

        let db = Database::connect(ConnectOptions::from_config(cfg)?)?;
        db.execute_batch(&script)?;

        messages::success("Script executed");
    }

    Ok(())
}
