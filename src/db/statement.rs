//! INSERT / UPDATE statement building.
//!
//! Values never end up in the SQL text: every value becomes a numbered
//! placeholder and is bound at execution time. `preview` keeps a rendering
//! with inline literals for dry runs and logs.

use crate::db::fields::FieldMap;
use crate::db::value::Value;
use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// SQL text plus the values bound to its `?N` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
    preview: String,
}

impl Statement {
    /// The statement with values rendered inline as SQL literals.
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview)
    }
}

/// `name` or `schema.name`, ASCII word characters, no leading digit.
pub fn validate_identifier(kind: &str, name: &str) -> AppResult<()> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("static identifier pattern")
    });

    if re.is_match(name) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid {kind} name: '{name}'")))
    }
}

fn check_fields(table: &str, fields: &FieldMap) -> AppResult<()> {
    validate_identifier("table", table)?;

    if fields.is_empty() {
        return Err(AppError::Validation(format!(
            "no fields given for table '{table}'"
        )));
    }

    for column in fields.columns() {
        validate_identifier("column", column)?;
    }

    Ok(())
}

/// `INSERT INTO table (c1, c2) VALUES (?1, ?2)`
pub fn build_insert(table: &str, fields: &FieldMap) -> AppResult<Statement> {
    check_fields(table, fields)?;

    let columns: Vec<&str> = fields.columns().collect();
    let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
    let literals: Vec<String> = fields.values().map(Value::to_sql_literal).collect();

    let head = format!("INSERT INTO {} ({})", table, columns.join(", "));

    Ok(Statement {
        sql: format!("{head} VALUES ({})", placeholders.join(", ")),
        params: fields.values().cloned().collect(),
        preview: format!("{head} VALUES ({})", literals.join(", ")),
    })
}

/// `UPDATE table SET c1 = ?1, c2 = ?2 WHERE <where_clause>`
///
/// The predicate is raw SQL and is appended as given.
pub fn build_update(table: &str, fields: &FieldMap, where_clause: &str) -> AppResult<Statement> {
    check_fields(table, fields)?;

    let predicate = where_clause.trim();
    if predicate.is_empty() {
        return Err(AppError::Validation(format!(
            "empty WHERE clause for update of '{table}'"
        )));
    }

    let mut sets = Vec::with_capacity(fields.len());
    let mut preview_sets = Vec::with_capacity(fields.len());
    for (i, (column, value)) in fields.iter().enumerate() {
        sets.push(format!("{column} = ?{}", i + 1));
        preview_sets.push(format!("{column} = {}", value.to_sql_literal()));
    }

    Ok(Statement {
        sql: format!("UPDATE {table} SET {} WHERE {predicate}", sets.join(", ")),
        params: fields.values().cloned().collect(),
        preview: format!(
            "UPDATE {table} SET {} WHERE {predicate}",
            preview_sets.join(", ")
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_field_order() {
        let fields = FieldMap::new().with("name", "Alice").with("age", 30);
        let stmt = build_insert("users", &fields).unwrap();

        assert_eq!(stmt.sql, "INSERT INTO users (name, age) VALUES (?1, ?2)");
        assert_eq!(stmt.params, vec![Value::from("Alice"), Value::from(30)]);
        assert_eq!(
            stmt.preview(),
            "INSERT INTO users (name, age) VALUES ('Alice', 30)"
        );
    }

    #[test]
    fn update_appends_predicate_verbatim() {
        let fields = FieldMap::new().with("age", 31).with("nick", Value::Null);
        let stmt = build_update("users", &fields, " name='Alice' ").unwrap();

        assert_eq!(
            stmt.sql,
            "UPDATE users SET age = ?1, nick = ?2 WHERE name='Alice'"
        );
        assert_eq!(
            stmt.to_string(),
            "UPDATE users SET age = 31, nick = NULL WHERE name='Alice'"
        );
    }

    #[test]
    fn empty_fields_are_rejected() {
        let err = build_insert("users", &FieldMap::new()).unwrap_err();
        assert!(err.is_validation());

        let err = build_update("users", &FieldMap::new(), "id = 1").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn blank_predicate_is_rejected() {
        let fields = FieldMap::new().with("age", 31);
        assert!(build_update("users", &fields, "   ").unwrap_err().is_validation());
    }

    #[test]
    fn identifiers_are_checked() {
        let fields = FieldMap::new().with("age", 1);
        assert!(build_insert("main.users", &fields).is_ok());
        assert!(build_insert("users; DROP TABLE x", &fields).is_err());
        assert!(build_insert("1users", &fields).is_err());

        let bad = FieldMap::new().with("age) VALUES (1); --", 1);
        assert!(build_insert("users", &bad).unwrap_err().is_validation());
    }

    #[test]
    fn preview_escapes_quotes() {
        let fields = FieldMap::new().with("name", "O'Brien");
        let stmt = build_insert("users", &fields).unwrap();
        assert_eq!(stmt.preview(), "INSERT INTO users (name) VALUES ('O''Brien')");
    }
}
