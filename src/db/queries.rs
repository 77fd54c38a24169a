use crate::db::row::{ResultSet, Row};
use crate::db::statement::Statement;
use crate::db::value::Value;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::sync::Arc;

/// Reject blank SQL before any connection is touched.
pub fn require_sql(sql: &str) -> AppResult<()> {
    if sql.trim().is_empty() {
        return Err(AppError::Validation("empty SQL statement".into()));
    }
    Ok(())
}

/// Run `sql` verbatim and materialize every row it returns.
///
/// Statements without a result (DDL, DML) give an empty set.
pub fn fetch_all(conn: &Connection, sql: &str) -> AppResult<ResultSet> {
    tracing::debug!(sql, "query");

    let mut stmt = conn.prepare(sql).map_err(|e| AppError::query(sql, e))?;

    let columns: Arc<[String]> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query([]).map_err(|e| AppError::query(sql, e))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(|e| AppError::query(sql, e))? {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            let v = row.get_ref(i).map_err(|e| AppError::query(sql, e))?;
            values.push(Value::from(v));
        }
        out.push(Row::new(Arc::clone(&columns), values));
    }

    tracing::debug!(rows = out.len(), "query done");

    Ok(ResultSet::new(columns, out))
}

/// Execute a built statement, binding its parameters. Returns affected rows.
pub fn execute(conn: &Connection, stmt: &Statement) -> AppResult<usize> {
    tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "execute");

    let affected = conn
        .execute(&stmt.sql, params_from_iter(stmt.params.iter()))
        .map_err(|e| AppError::query(&stmt.sql, e))?;

    tracing::debug!(affected, "execute done");
    Ok(affected)
}

/// Run a multi-statement script; any rows produced are discarded.
pub fn execute_script(conn: &Connection, sql: &str) -> AppResult<()> {
    tracing::debug!(bytes = sql.len(), "execute script");
    conn.execute_batch(sql).map_err(|e| AppError::query(sql, e))
}

/// Whether `table` (`name` or `schema.name`) was created `WITHOUT ROWID`.
/// Unknown tables count as rowid tables.
pub fn is_without_rowid(conn: &Connection, table: &str) -> AppResult<bool> {
    const SQL: &str = "SELECT wr FROM pragma_table_list \
         WHERE name = ?1 COLLATE NOCASE AND (?2 IS NULL OR schema = ?2 COLLATE NOCASE) \
         LIMIT 1";

    let (schema, name) = match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    };

    let wr: Option<i64> = conn
        .query_row(SQL, params![name, schema], |row| row.get(0))
        .optional()
        .map_err(|e| AppError::query(SQL, e))?;

    Ok(wr == Some(1))
}

/// Charset, session time zone and current session time, read through SQL.
pub fn session_info(conn: &Connection) -> AppResult<(String, String, String)> {
    const SQL: &str = "SELECT (SELECT encoding FROM pragma_encoding), session_time_zone(), now()";

    conn.query_row(SQL, [], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })
    .map_err(|e| AppError::query(SQL, e))
}
