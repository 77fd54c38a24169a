use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::fields::parse_assignments;
use crate::db::statement::build_update;
use crate::db::{ConnectOptions, Database};
use crate::errors::AppResult;
use crate::ui::messages;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Update {
        table,
        fields,
        where_clause,
        dry_run,
    } = cmd
    {
        let fields = parse_assignments(fields)?;

        if *dry_run {
            println!("{}", build_update(table, &fields, where_clause)?);
            return Ok(());
        }

        let db = Database::connect(ConnectOptions::from_config(cfg)?)?;
        let res = db.update(table, &fields, where_clause)?;

        if res.affected_rows == 0 {
            messages::warning(format!("No rows in {table} matched: {where_clause}"));
        } else {
            messages::success(format!("Updated {} row(s) in {table}", res.affected_rows));
        }
    }

    Ok(())
}
