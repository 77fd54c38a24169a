//! Rendering of result sets for the CLI.

use crate::db::{ResultSet, Value};
use crate::errors::{AppError, AppResult};
use crate::utils::colors::GREY;
use crate::utils::table::{Cell, Column, Table};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn render(rs: &ResultSet, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Table => Ok(render_table(rs)),
        OutputFormat::Json => render_json(rs),
        OutputFormat::Csv => render_csv(rs),
    }
}

pub fn render_table(rs: &ResultSet) -> String {
    let columns = rs.columns().iter().map(Column::new).collect();
    let mut table = Table::new(columns);

    for row in rs {
        let cells = row
            .values()
            .iter()
            .map(|v| match v {
                Value::Null => Cell::colored("NULL", GREY),
                other => Cell::plain(other.to_string()),
            })
            .collect();
        table.add_row(cells);
    }

    table.render()
}

pub fn render_json(rs: &ResultSet) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(rs)?)
}

pub fn render_csv(rs: &ResultSet) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(rs.columns())?;
    for row in rs {
        wtr.write_record(row.values().iter().map(|v| match v {
            Value::Null => String::new(),
            other => other.to_string(),
        }))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
