use bookstore_core::ServiceError;
use bookstore_sql::SQLStore;

/// Users table: full record JSON in `data`, indexed columns for lookup
/// and uniqueness. Email uniqueness is enforced here, not in code.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        email TEXT UNIQUE,
        role TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
