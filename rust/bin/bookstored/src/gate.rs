//! Session gate middleware.
//!
//! Runs before every handler. Resolves the session token (cookie or
//! `Authorization: Bearer`) into a [`Session`] exactly once and stores
//! it in the request extensions; handlers take `Extension<Session>`.
//!
//! Browser-facing enforcement happens here too: a request under the
//! protected prefix without a valid session redirects to `/login`, and
//! a non-admin session under the admin prefix redirects to `/`. API
//! handlers do their own role checks on top of this.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use bookstore_auth::service::AuthService;
use bookstore_core::Session;

use crate::config::GateConfig;

pub struct Gate {
    pub auth: Arc<AuthService>,
    pub config: GateConfig,
}

pub async fn session_gate(
    State(gate): State<Arc<Gate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = resolve_session(&gate, &request);

    let path = request.uri().path();
    if path.starts_with(&gate.config.protected_prefix) && session.is_none() {
        return Redirect::to("/login").into_response();
    }
    if path.starts_with(&gate.config.admin_prefix) {
        match &session {
            Some(s) if s.is_admin() => {}
            Some(_) => return Redirect::to("/").into_response(),
            None => return Redirect::to("/login").into_response(),
        }
    }

    if let Some(session) = session {
        request.extensions_mut().insert(session);
    }
    next.run(request).await
}

/// Token from the session cookie, falling back to a Bearer header.
/// Invalid or expired tokens resolve to no session rather than an
/// error; the prefix rules above decide what that means.
fn resolve_session(gate: &Gate, request: &Request) -> Option<Session> {
    let token = cookie_token(gate, request).or_else(|| bearer_token(request))?;
    gate.auth.verify_token(&token).ok()
}

fn cookie_token(gate: &Gate, request: &Request) -> Option<String> {
    let prefix = format!("{}=", gate.config.cookie_name);
    for value in request.headers().get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else { continue };
        for pair in value.split(';') {
            if let Some(token) = pair.trim().strip_prefix(&prefix) {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
