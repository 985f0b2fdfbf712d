use serde::{Deserialize, Serialize};

use bookstore_core::Role;

use crate::model::UserView;

/// JWT claims payload for a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,

    /// Display name.
    pub name: String,

    /// Account email.
    pub email: String,

    /// Account role at issuance time.
    pub role: Role,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Credential pair submitted to the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body returned after a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserView,
}
