pub mod docs;
pub mod error;
pub mod sqlite;
pub mod traits;

pub use docs::{Collection, DocError};
pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
