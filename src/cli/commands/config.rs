use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        if *edit_config {
            let path = Config::config_file();
            if !path.exists() {
                cfg.save_to(&path)?;
            }

            let used = ConfigLogic::edit(&path, editor.as_deref())?;
            messages::success(format!("Configuration file edited using '{used}'"));
        }
    }

    Ok(())
}
