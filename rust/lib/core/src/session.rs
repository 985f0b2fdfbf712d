//! The per-request `Session` value object.
//!
//! The gate middleware resolves the session token once per request and
//! inserts a `Session` into the request extensions; handlers receive it
//! explicitly via `Extension<Session>` — there is no ambient lookup.

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Account role. Admins may mutate catalog data and manage users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// The authenticated identity for one request, decoded from the
/// session token. Stateless — nothing here is persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Handler-layer admin check for admin-scoped operations.
///
/// The gate already redirects browser traffic on the dashboard prefix;
/// this closes the remaining hole where an authenticated non-admin
/// calls an admin API endpoint directly.
pub fn require_admin(session: Option<&Session>) -> Result<(), ServiceError> {
    match session {
        None => Err(ServiceError::Unauthorized("login required".into())),
        Some(s) if s.is_admin() => Ok(()),
        Some(s) => Err(ServiceError::Forbidden(format!(
            "account '{}' lacks the admin role",
            s.email
        ))),
    }
}
