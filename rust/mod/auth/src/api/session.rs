//! Register, login, logout.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use bookstore_core::{collect_form, normalize, ok, ServiceError};

use crate::api::AppState;
use crate::model::{LoginRequest, TokenResponse};
use crate::service::user::USER_FIELDS;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Public self-registration. Role is forced to `user` server-side.
async fn register(
    State(service): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, USER_FIELDS)?;
    let view = service.register(doc)?;
    info!(user = %view.id, email = %view.email, "registered");
    Ok((StatusCode::CREATED, ok(view)))
}

/// Verify credentials, set the session cookie, and return the token
/// so API clients can also use a Bearer header.
async fn login(
    State(service): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (user, token) = service.login(&request.email, &request.password)?;
    let config = service.config();
    info!(user = %user.id, "logged in");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.cookie_name, token, config.session_ttl,
    );
    let body = TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: config.session_ttl,
        user,
    };
    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), ok(body)))
}

/// Clear the session cookie. The token itself stays valid until it
/// expires; logout is a client-side affair.
async fn logout(State(service): State<AppState>) -> impl IntoResponse {
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        service.config().cookie_name,
    );
    (AppendHeaders([(header::SET_COOKIE, cookie)]), ok(serde_json::json!({})))
}
