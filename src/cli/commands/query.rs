use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::render::{self, OutputFormat};
use crate::db::{ConnectOptions, Database};
use crate::errors::AppResult;
use crate::utils::colors::{GREY, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Query { sql, format } = cmd {
        let db = Database::connect(ConnectOptions::from_config(cfg)?)?;
        let rs = db.query(sql)?;

        print!("{}", render::render(&rs, *format)?);

        if *format == OutputFormat::Table {
            let n = rs.len();
            println!("{GREY}({n} row{}){RESET}", if n == 1 { "" } else { "s" });
        } else if *format == OutputFormat::Json {
            println!();
        }
    }

    Ok(())
}
