use serde::{Deserialize, Serialize};

use bookstore_core::Role;

/// A stored user record. This is what lands in the `users` collection —
/// including the password digest — and must never be serialized into a
/// response body. Handlers return [`UserView`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    pub name: String,

    /// Unique across the collection (UNIQUE column on the table).
    pub email: String,

    /// Argon2id digest. Plaintext passwords exist only transiently
    /// inside the create/edit/login paths.
    pub password_hash: String,

    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// RFC 3339 timestamps.
    pub created_at: String,
    pub updated_at: String,
}

/// The response projection of a user — everything except the digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        UserView {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            address: u.address,
            phone: u.phone,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_never_carries_password_material() {
        let user = User {
            id: "u1".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$salt$digest".into(),
            role: Role::Admin,
            address: None,
            phone: Some("0901234567".into()),
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_string(&UserView::from(user)).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"admin\""));
    }

    #[test]
    fn stored_record_round_trips() {
        let json = serde_json::json!({
            "id": "u1",
            "name": "Bob",
            "email": "bob@example.com",
            "passwordHash": "digest",
            "role": "user",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.address.is_none());
    }
}
