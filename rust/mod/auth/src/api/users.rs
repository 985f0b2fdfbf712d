//! User management endpoints. Every route here is admin-only.

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tracing::info;

use bookstore_core::{collect_form, normalize, ok, require_admin, ServiceError, Session};

use crate::api::AppState;
use crate::service::user::USER_FIELDS;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/add", post(add_user))
        .route(
            "/users/{id}",
            get(get_user).patch(edit_user).delete(delete_user),
        )
}

fn admin(session: &Option<Extension<Session>>) -> Result<(), ServiceError> {
    require_admin(session.as_ref().map(|e| &e.0))
}

async fn list_users(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    Ok(ok(service.list_users()?))
}

async fn add_user(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, USER_FIELDS)?;
    let view = service.create_user(doc)?;
    info!(user = %view.id, "user created");
    Ok(ok(view))
}

async fn get_user(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    Ok(ok(service.get_user(&id)?))
}

async fn edit_user(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, USER_FIELDS)?;
    let view = service.update_user(&id, doc)?;
    info!(user = %view.id, "user updated");
    Ok(ok(view))
}

async fn delete_user(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    service.delete_user(&id)?;
    info!(user = %id, "user deleted");
    Ok(ok(serde_json::json!({ "id": id })))
}
