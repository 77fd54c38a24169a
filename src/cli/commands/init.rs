use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::{ConnectOptions, Database};
use crate::errors::AppResult;
use crate::ui::messages;

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (skipped in test mode)
///  - the SQLite database file, created if missing
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    messages::info("Initializing rdbhelper…");
    if !cli.test {
        messages::field("Config file", Config::config_file().display());
    }
    messages::field("Database", &cfg.database);

    if let Some(dir) = std::path::Path::new(&cfg.database).parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    let options = ConnectOptions::from_config(&cfg)?.create_if_missing(true);
    let db = Database::connect(options)?;
    db.close();

    messages::success(format!("Database ready at {}", cfg.database));
    Ok(())
}
