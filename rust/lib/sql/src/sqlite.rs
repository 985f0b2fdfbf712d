use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SQLStore backed by rusqlite (bundled SQLite).
///
/// A single connection behind a mutex; statements are serialized, which
/// matches the one-round-trip-per-request execution model.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database file.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path).map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn bind<'a>(params: &'a [Value]) -> Vec<Box<dyn rusqlite::types::ToSql + 'a>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + 'a> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

fn column_value(row: &rusqlite::Row, idx: usize) -> Value {
    use rusqlite::types::ValueRef;
    match row.get_ref(idx) {
        Ok(ValueRef::Null) | Err(_) => Value::Null,
        Ok(ValueRef::Integer(i)) => Value::Integer(i),
        Ok(ValueRef::Real(f)) => Value::Real(f),
        Ok(ValueRef::Text(t)) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        Ok(ValueRef::Blob(b)) => Value::Blob(b.to_vec()),
    }
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.conn.lock().map_err(|e| SQLError::Query(e.to_string()))?;

        let mut stmt = conn.prepare(sql).map_err(|e| SQLError::Query(e.to_string()))?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let bound = bind(params);
        let refs: Vec<&dyn rusqlite::types::ToSql> = bound.iter().map(|b| b.as_ref()).collect();

        let mapped = stmt
            .query_map(refs.as_slice(), |row| {
                let columns = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), column_value(row, i)))
                    .collect();
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut rows = Vec::new();
        for row in mapped {
            rows.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
        }
        Ok(rows)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        let bound = bind(params);
        let refs: Vec<&dyn rusqlite::types::ToSql> = bound.iter().map(|b| b.as_ref()).collect();

        let affected = conn
            .execute(sql, refs.as_slice())
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        Ok(affected as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec("CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER, x REAL)", &[])
            .unwrap();
        s
    }

    #[test]
    fn exec_and_query_round_trip() {
        let s = store();
        let affected = s
            .exec(
                "INSERT INTO t (id, n, x) VALUES (?1, ?2, ?3)",
                &[Value::Text("a".into()), Value::Integer(3), Value::Real(1.5)],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = s
            .query("SELECT id, n, x FROM t WHERE id = ?1", &[Value::Text("a".into())])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("id"), Some("a"));
        assert_eq!(rows[0].integer("n"), Some(3));
        assert_eq!(rows[0].real("x"), Some(1.5));
    }

    #[test]
    fn null_columns_read_as_none() {
        let s = store();
        s.exec("INSERT INTO t (id) VALUES (?1)", &[Value::Text("a".into())])
            .unwrap();
        let rows = s.query("SELECT n FROM t", &[]).unwrap();
        assert_eq!(rows[0].integer("n"), None);
    }

    #[test]
    fn open_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.sqlite");
        let s = SqliteStore::open(&path).unwrap();
        s.exec("CREATE TABLE t (id TEXT)", &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn syntax_error_is_reported() {
        let s = store();
        assert!(s.query("SELEKT 1", &[]).is_err());
    }
}
