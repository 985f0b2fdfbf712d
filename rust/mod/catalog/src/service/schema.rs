use bookstore_core::ServiceError;
use bookstore_sql::SQLStore;

/// Catalog tables: full record JSON in `data`, indexed columns for
/// filtering and aggregates. Numeric columns (price, stock) back the
/// overview statistics.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS books (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        title TEXT,
        author TEXT,
        price REAL,
        stock INTEGER,
        category_id TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_books_category ON books(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_books_created ON books(created_at)",
    "CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        slug TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_categories_slug ON categories(slug)",
    "CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        user_id TEXT,
        payment_status TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_invoices_user ON invoices(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_invoices_status ON invoices(payment_status)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
