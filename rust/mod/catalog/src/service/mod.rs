pub mod book;
pub mod category;
pub mod invoice;
pub mod overview;
pub mod schema;
pub mod slug;

use std::sync::Arc;

use bookstore_core::ServiceError;
use bookstore_sql::{Collection, DocError, SQLStore};

/// The catalog service. One instance owns all three resource tables.
pub struct CatalogService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl CatalogService {
    /// Create the service, initializing the catalog tables.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }

    pub(crate) fn books(&self) -> Collection<'_> {
        Collection::new(self.sql.as_ref(), "books")
    }

    pub(crate) fn categories(&self) -> Collection<'_> {
        Collection::new(self.sql.as_ref(), "categories")
    }

    pub(crate) fn invoices(&self) -> Collection<'_> {
        Collection::new(self.sql.as_ref(), "invoices")
    }
}

/// Map a collection error onto the service taxonomy.
pub(crate) fn store_err(e: DocError) -> ServiceError {
    match e {
        DocError::NotFound(m) => ServiceError::NotFound(m),
        DocError::Conflict(m) => ServiceError::Conflict(m),
        DocError::Storage(m) => ServiceError::Storage(m),
        DocError::Codec(m) => ServiceError::Internal(m),
    }
}
