pub mod password;
pub mod schema;
pub mod session;
pub mod user;

use std::sync::Arc;

use bookstore_core::ServiceError;
use bookstore_sql::{Collection, DocError, SQLStore};

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Session token lifetime in seconds (default: 24h).
    pub session_ttl: i64,
    /// Name of the session cookie set on login.
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "bookstore-dev-secret-change-me".to_string(),
            session_ttl: 86400,
            cookie_name: "bookstore_session".to_string(),
        }
    }
}

/// The auth service. Holds the store and token configuration.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create the service, initializing the users table.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn users(&self) -> Collection<'_> {
        Collection::new(self.sql.as_ref(), "users")
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
