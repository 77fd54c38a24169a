//! Column → value mapping used as input to insert/update.

use crate::db::value::Value;

/// Ordered map of column names to values.
///
/// Keys are unique: inserting an existing key replaces its value in place,
/// so the column keeps its original position in the generated SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert or replace a column value. Returns the previous value, if any.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let column = column.into();
        let value = value.into();

        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == column) {
            return Some(std::mem::replace(slot, value));
        }

        self.entries.push((column, value));
        None
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position_and_replaces_value() {
        let mut map = FieldMap::new().with("name", "Alice").with("age", 30);
        let previous = map.insert("name", "Bob");

        assert_eq!(previous, Some(Value::from("Alice")));
        assert_eq!(map.columns().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(map.get("name"), Some(&Value::from("Bob")));
        assert_eq!(map.len(), 2);
    }
}
