//! Login and token verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use bookstore_core::{ServiceError, Session};
use bookstore_sql::Value;

use crate::model::{Claims, User, UserView};
use crate::service::{store_err, AuthService};

impl AuthService {
    /// Verify credentials and issue a session token.
    ///
    /// Unknown email and bad password are distinct failures so the
    /// client can show the right message; both map to 401.
    pub fn login(&self, email: &str, password: &str) -> Result<(UserView, String), ServiceError> {
        let user: Option<User> = self
            .users()
            .find_by("email", Value::Text(email.to_string()))
            .map_err(store_err)?;
        let user = user.ok_or_else(|| {
            ServiceError::EmailNotFound(format!("no account for '{}'", email))
        })?;

        if !super::password::verify_password(password, &user.password_hash) {
            return Err(ServiceError::InvalidPassword("wrong password".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok((UserView::from(user), token))
    }

    /// Sign a JWT carrying the user's identity and role.
    pub fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.config.session_ttl,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("token signing failed: {}", e)))
    }

    /// Decode a token into a [`Session`]. Expired, tampered, and
    /// malformed tokens all come back as `UNAUTHENTICATED`.
    pub fn verify_token(&self, token: &str) -> Result<Session, ServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| ServiceError::Unauthorized("invalid session token".to_string()))?;

        let claims = data.claims;
        Ok(Session {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }
}
