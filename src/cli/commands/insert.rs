use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::fields::parse_assignments;
use crate::db::statement::build_insert;
use crate::db::{ConnectOptions, Database};
use crate::errors::AppResult;
use crate::ui::messages;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Insert {
        table,
        fields,
        dry_run,
    } = cmd
    {
        let fields = parse_assignments(fields)?;

        if *dry_run {
            println!("{}", build_insert(table, &fields)?);
            return Ok(());
        }

        let db = Database::connect(ConnectOptions::from_config(cfg)?)?;
        let res = db.insert(table, &fields)?;

        match res.last_insert_id {
            Some(id) => messages::success(format!(
                "Inserted {} row(s) into {table} (rowid {id})",
                res.affected_rows
            )),
            None => messages::success(format!(
                "Inserted {} row(s) into {table}",
                res.affected_rows
            )),
        }
    }

    Ok(())
}
