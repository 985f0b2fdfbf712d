use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

// ── Error kinds ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. The dashboard localizes its
// messages off `kind`; the `message` string is an English diagnostic
// and may be reworded at any time.

/// Stable error kind constants.
pub mod error_kind {
    pub const VALIDATION: &str = "VALIDATION";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const EMAIL_NOT_FOUND: &str = "EMAIL_NOT_FOUND";
    pub const INVALID_PASSWORD: &str = "INVALID_PASSWORD";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error used across all modules.
///
/// Every handled failure maps to one of these variants; each variant
/// carries a stable kind (see [`error_kind`]) and an HTTP status. The
/// JSON body is always the discriminated envelope:
///
/// ```json
/// {"ok": false, "error": {"kind": "NOT_FOUND", "message": "book 'abc' not found"}}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or malformed input fields. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// The id does not resolve to an existing record. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate key or referenced record. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Login: no account for the submitted email. HTTP 401.
    /// Kept distinct from [`ServiceError::InvalidPassword`] so the UI
    /// can message the two cases differently.
    #[error("{0}")]
    EmailNotFound(String),

    /// Login: the password does not match the stored digest. HTTP 401.
    #[error("{0}")]
    InvalidPassword(String),

    /// No valid session where one is required. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid session but insufficient role. HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => error_kind::VALIDATION,
            ServiceError::NotFound(_) => error_kind::NOT_FOUND,
            ServiceError::Conflict(_) => error_kind::CONFLICT,
            ServiceError::EmailNotFound(_) => error_kind::EMAIL_NOT_FOUND,
            ServiceError::InvalidPassword(_) => error_kind::INVALID_PASSWORD,
            ServiceError::Unauthorized(_) => error_kind::UNAUTHENTICATED,
            ServiceError::Forbidden(_) => error_kind::PERMISSION_DENIED,
            ServiceError::Storage(_) => error_kind::STORAGE_ERROR,
            ServiceError::Internal(_) => error_kind::INTERNAL,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::EmailNotFound(_)
            | ServiceError::InvalidPassword(_)
            | ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "ok": false,
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            },
        });
        (status, Json(body)).into_response()
    }
}

/// Wrap a successful payload in the discriminated envelope.
pub fn ok<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "data": data}))
}
