//! Document collections over SQL tables.
//!
//! Every resource table follows the same shape: an `id` primary key, a
//! `data` column holding the full record as JSON, and a handful of
//! indexed columns extracted for filtering, uniqueness, and aggregates.
//! [`Collection`] is the one implementation of that pattern shared by
//! all services.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::traits::{Row, SQLStore, Value};

#[derive(Debug, Error)]
pub enum DocError {
    #[error("{0}")]
    NotFound(String),

    /// UNIQUE constraint violation.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Storage(String),

    /// A stored `data` column failed to (de)serialize.
    #[error("{0}")]
    Codec(String),
}

/// A typed view over one resource table.
pub struct Collection<'a> {
    sql: &'a dyn SQLStore,
    table: &'static str,
}

impl<'a> Collection<'a> {
    pub fn new(sql: &'a dyn SQLStore, table: &'static str) -> Self {
        Self { sql, table }
    }

    /// Insert a record, serializing it into `data` alongside the given
    /// indexed columns. UNIQUE violations surface as [`DocError::Conflict`].
    pub fn insert<T: Serialize>(
        &self,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), DocError> {
        let json = serde_json::to_string(record).map_err(|e| DocError::Codec(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];
        for (i, (col, val)) in indexes.iter().enumerate() {
            cols.push(col);
            placeholders.push(format!("?{}", i + 3));
            params.push(val.clone());
        }

        let stmt = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            cols.join(", "),
            placeholders.join(", "),
        );
        self.sql.exec(&stmt, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                DocError::Conflict(msg)
            } else {
                DocError::Storage(msg)
            }
        })?;
        Ok(())
    }

    /// Fetch one record by id.
    pub fn fetch<T: DeserializeOwned>(&self, id: &str) -> Result<T, DocError> {
        let stmt = format!("SELECT data FROM {} WHERE id = ?1", self.table);
        let rows = self
            .sql
            .query(&stmt, &[Value::Text(id.to_string())])
            .map_err(|e| DocError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| DocError::NotFound(format!("{}/{}", self.table, id)))?;
        decode(row)
    }

    /// Overwrite a record and its indexed columns. Fails with
    /// [`DocError::NotFound`] when the id does not resolve.
    pub fn update<T: Serialize>(
        &self,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), DocError> {
        let json = serde_json::to_string(record).map_err(|e| DocError::Codec(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];
        for (i, (col, val)) in indexes.iter().enumerate() {
            sets.push(format!("{} = ?{}", col, i + 2));
            params.push(val.clone());
        }
        let id_slot = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let stmt = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            self.table,
            sets.join(", "),
            id_slot,
        );
        let affected = self.sql.exec(&stmt, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                DocError::Conflict(msg)
            } else {
                DocError::Storage(msg)
            }
        })?;
        if affected == 0 {
            return Err(DocError::NotFound(format!("{}/{}", self.table, id)));
        }
        Ok(())
    }

    /// Delete a record by id; never silently succeeds on a missing id.
    pub fn delete(&self, id: &str) -> Result<(), DocError> {
        let stmt = format!("DELETE FROM {} WHERE id = ?1", self.table);
        let affected = self
            .sql
            .exec(&stmt, &[Value::Text(id.to_string())])
            .map_err(|e| DocError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(DocError::NotFound(format!("{}/{}", self.table, id)));
        }
        Ok(())
    }

    /// List every record, optionally ordered by an indexed column
    /// expression (internal call sites pass literals only).
    pub fn list<T: DeserializeOwned>(&self, order_by: Option<&str>) -> Result<Vec<T>, DocError> {
        let stmt = match order_by {
            Some(order) => format!("SELECT data FROM {} ORDER BY {}", self.table, order),
            None => format!("SELECT data FROM {}", self.table),
        };
        let rows = self
            .sql
            .query(&stmt, &[])
            .map_err(|e| DocError::Storage(e.to_string()))?;
        rows.iter().map(decode).collect()
    }

    /// List records matching one indexed column.
    pub fn list_where<T: DeserializeOwned>(
        &self,
        column: &str,
        value: Value,
        order_by: Option<&str>,
    ) -> Result<Vec<T>, DocError> {
        let mut stmt = format!("SELECT data FROM {} WHERE {} = ?1", self.table, column);
        if let Some(order) = order_by {
            stmt.push_str(&format!(" ORDER BY {}", order));
        }
        let rows = self
            .sql
            .query(&stmt, &[value])
            .map_err(|e| DocError::Storage(e.to_string()))?;
        rows.iter().map(decode).collect()
    }

    /// First record matching one indexed column, if any.
    pub fn find_by<T: DeserializeOwned>(
        &self,
        column: &str,
        value: Value,
    ) -> Result<Option<T>, DocError> {
        let stmt = format!(
            "SELECT data FROM {} WHERE {} = ?1 LIMIT 1",
            self.table, column
        );
        let rows = self
            .sql
            .query(&stmt, &[value])
            .map_err(|e| DocError::Storage(e.to_string()))?;
        rows.first().map(decode).transpose()
    }

    /// Count records matching one indexed column.
    pub fn count_where(&self, column: &str, value: Value) -> Result<i64, DocError> {
        let stmt = format!(
            "SELECT COUNT(*) AS cnt FROM {} WHERE {} = ?1",
            self.table, column
        );
        let rows = self
            .sql
            .query(&stmt, &[value])
            .map_err(|e| DocError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.integer("cnt")).unwrap_or(0))
    }
}

fn decode<T: DeserializeOwned>(row: &Row) -> Result<T, DocError> {
    let data = row
        .text("data")
        .ok_or_else(|| DocError::Codec("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| DocError::Codec(e.to_string()))
}
