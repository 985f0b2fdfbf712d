pub mod error;
pub mod form;
pub mod module;
pub mod session;
pub mod types;

pub use error::{error_kind, ok, ServiceError};
pub use form::{collect_form, normalize, require, FieldDef, FieldKind};
pub use module::Module;
pub use session::{require_admin, Role, Session};
pub use types::{apply_patch, merge_patch, new_id, now_rfc3339};
