use crate::error::SQLError;

/// A dynamically-typed SQL parameter or result value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// One result row: column name → value, in select order.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Text column by name, `None` for any other type.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer column by name.
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Real column by name; integers widen to f64 (SQLite aggregates
    /// like AVG may come back as either).
    pub fn real(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Value::Real(f)) => Some(*f),
            Some(Value::Integer(i)) => Some(*i as f64),
            _ => None,
        }
    }
}

/// SQL execution interface backed by an embedded database.
///
/// The only shared resource in the system; per-statement atomicity is
/// all the concurrency control the application relies on.
pub trait SQLStore: Send + Sync {
    /// Run a SELECT and return its rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError>;

    /// Run an INSERT/UPDATE/DELETE/DDL statement and return the
    /// affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_accessors() {
        let row = Row {
            columns: vec![
                ("id".into(), Value::Text("abc".into())),
                ("count".into(), Value::Integer(7)),
                ("avg".into(), Value::Real(1.5)),
            ],
        };
        assert_eq!(row.text("id"), Some("abc"));
        assert_eq!(row.integer("count"), Some(7));
        assert_eq!(row.real("avg"), Some(1.5));
        assert_eq!(row.real("count"), Some(7.0));
        assert_eq!(row.text("missing"), None);
        assert_eq!(row.integer("id"), None);
    }
}
