//! User CRUD.

use serde_json::Map;

use bookstore_core::{apply_patch, new_id, now_rfc3339, require, FieldDef, FieldKind, Role, ServiceError};
use bookstore_sql::Value;

use crate::model::{User, UserView};
use crate::service::{store_err, AuthService};

/// Coercion table for user add/edit forms. Submitted fields outside
/// this list never reach the record.
pub const USER_FIELDS: &[FieldDef] = &[
    FieldDef { name: "name", kind: FieldKind::Text },
    FieldDef { name: "email", kind: FieldKind::Text },
    FieldDef { name: "password", kind: FieldKind::Text },
    FieldDef { name: "role", kind: FieldKind::Text },
    FieldDef { name: "address", kind: FieldKind::Text },
    FieldDef { name: "phone", kind: FieldKind::Text },
];

const USER_REQUIRED: &[&str] = &["name", "email", "password", "role"];
const REGISTER_REQUIRED: &[&str] = &["name", "email", "password"];

fn take_str(doc: &mut Map<String, serde_json::Value>, key: &str) -> Option<String> {
    match doc.remove(key) {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

fn parse_role(raw: &str) -> Result<Role, ServiceError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| ServiceError::Validation(format!("unknown role '{}'", raw)))
}

fn index_columns(user: &User) -> [(&'static str, Value); 5] {
    [
        ("name", Value::Text(user.name.clone())),
        ("email", Value::Text(user.email.clone())),
        ("role", Value::Text(user.role.as_str().to_string())),
        ("created_at", Value::Text(user.created_at.clone())),
        ("updated_at", Value::Text(user.updated_at.clone())),
    ]
}

impl AuthService {
    /// Admin-side create: all fields come from the form, role included.
    pub fn create_user(&self, mut doc: Map<String, serde_json::Value>) -> Result<UserView, ServiceError> {
        require(&doc, USER_REQUIRED)?;
        let role = match take_str(&mut doc, "role") {
            Some(raw) => parse_role(&raw)?,
            None => Role::User,
        };
        self.create_from_doc(doc, role)
    }

    /// Public self-registration: role is always `user`, whatever the
    /// form claims.
    pub fn register(&self, mut doc: Map<String, serde_json::Value>) -> Result<UserView, ServiceError> {
        require(&doc, REGISTER_REQUIRED)?;
        doc.remove("role");
        self.create_from_doc(doc, Role::User)
    }

    fn create_from_doc(
        &self,
        mut doc: Map<String, serde_json::Value>,
        role: Role,
    ) -> Result<UserView, ServiceError> {
        // Required fields were asserted by the callers.
        let name = take_str(&mut doc, "name").unwrap_or_default();
        let email = take_str(&mut doc, "email").unwrap_or_default();
        let password = take_str(&mut doc, "password").unwrap_or_default();
        let address = take_str(&mut doc, "address");
        let phone = take_str(&mut doc, "phone");

        let hash = super::password::hash_password(&password)?;
        let user = self.persist_new(&name, &email, &hash, role, address, phone)?;
        Ok(UserView::from(user))
    }

    /// Insert a user whose password is already hashed. The bootstrap
    /// path and tests come through here.
    pub fn create_with_hash(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        address: Option<String>,
        phone: Option<String>,
    ) -> Result<User, ServiceError> {
        self.persist_new(name, email, password_hash, role, address, phone)
    }

    fn persist_new(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        address: Option<String>,
        phone: Option<String>,
    ) -> Result<User, ServiceError> {
        // Friendly message first; the UNIQUE column is the backstop
        // against races.
        if self.find_by_email(email)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "email '{}' is already registered",
                email
            )));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            address,
            phone,
            created_at: now.clone(),
            updated_at: now,
        };
        self.users()
            .insert(&user.id, &user, &index_columns(&user))
            .map_err(store_err)?;
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<UserView, ServiceError> {
        let user: User = self.users().fetch(id).map_err(store_err)?;
        Ok(UserView::from(user))
    }

    pub fn list_users(&self) -> Result<Vec<UserView>, ServiceError> {
        let users: Vec<User> = self
            .users()
            .list(Some("created_at DESC"))
            .map_err(store_err)?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    /// Partial update. A submitted password is re-hashed; id and
    /// createdAt are pinned by the patch layer.
    pub fn update_user(
        &self,
        id: &str,
        mut doc: Map<String, serde_json::Value>,
    ) -> Result<UserView, ServiceError> {
        let current: User = self.users().fetch(id).map_err(store_err)?;

        if let Some(password) = take_str(&mut doc, "password") {
            let hash = super::password::hash_password(&password)?;
            doc.insert("passwordHash".to_string(), serde_json::Value::String(hash));
        }
        if let Some(serde_json::Value::String(email)) = doc.get("email") {
            if email != &current.email && self.find_by_email(email)?.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "email '{}' is already registered",
                    email
                )));
            }
        }

        let updated: User = apply_patch(&current, doc, &current.id, &current.created_at)?;
        self.users()
            .update(id, &updated, &index_columns(&updated))
            .map_err(store_err)?;
        Ok(UserView::from(updated))
    }

    pub fn delete_user(&self, id: &str) -> Result<(), ServiceError> {
        self.users().delete(id).map_err(store_err)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.users()
            .find_by("email", Value::Text(email.to_string()))
            .map_err(store_err)
    }

    /// Create the seed admin account unless the email already exists.
    /// Returns true when a new account was created.
    pub fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, ServiceError> {
        if self.find_by_email(email)?.is_some() {
            return Ok(false);
        }
        self.persist_new(name, email, password_hash, Role::Admin, None, None)?;
        Ok(true)
    }
}
