//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: impl Into<String>) -> Self {
        let header = header.into();
        let width = header.width();
        Self { header, width }
    }
}

/// A cell: the text used for width computation plus an optional color.
pub struct Cell {
    pub text: String,
    pub color: Option<&'static str>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: &'static str) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row and widen columns to fit it.
    pub fn add_row(&mut self, row: Vec<Cell>) {
        for (col, cell) in self.columns.iter_mut().zip(row.iter()) {
            col.width = col.width.max(cell.text.width());
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            push_padded(&mut out, &col.header, col.width, None);
        }
        out.push('\n');

        for col in &self.columns {
            out.push_str(&"-".repeat(col.width));
            out.push(' ');
        }
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                match row.get(i) {
                    Some(cell) => push_padded(&mut out, &cell.text, col.width, cell.color),
                    None => push_padded(&mut out, "", col.width, None),
                }
            }
            out.push('\n');
        }

        out
    }
}

// `format!` pads by char count; wide characters need display width.
fn push_padded(out: &mut String, text: &str, width: usize, color: Option<&str>) {
    let pad = width.saturating_sub(text.width());
    match color {
        Some(c) => {
            out.push_str(c);
            out.push_str(text);
            out.push_str(super::colors::RESET);
        }
        None => out.push_str(text),
    }
    out.push_str(&" ".repeat(pad + 1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_grow_with_content() {
        let mut t = Table::new(vec![Column::new("id"), Column::new("name")]);
        t.add_row(vec![Cell::plain("1"), Cell::plain("Alice")]);
        t.add_row(vec![Cell::plain("2"), Cell::plain("张伟")]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id name  ");
        assert_eq!(lines[1], "-- ----- ");
        assert_eq!(lines[2], "1  Alice ");
        assert_eq!(lines[3], "2  张伟  ");
    }
}
