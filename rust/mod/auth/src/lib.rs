//! Auth module — credential accounts, session tokens, user management.
//!
//! # Resources
//!
//! - **User** — name/email/password-digest/role record
//! - **Session** — signed JWT carrying {userId, name, email, role};
//!   stateless, nothing stored server-side
//!
//! # Usage
//!
//! ```ignore
//! use bookstore_auth::{AuthModule, service::{AuthConfig, AuthService}};
//!
//! let service = AuthService::new(sql, AuthConfig::default())?;
//! let module = AuthModule::new(service);
//! let router = module.routes(); // mounted under /api by the binary
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use bookstore_core::Module;

use crate::service::AuthService;

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
