//! Category endpoints. Reads are public; mutations are admin-only.

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tracing::info;

use bookstore_core::{collect_form, normalize, ok, require_admin, ServiceError, Session};

use crate::api::AppState;
use crate::service::category::CATEGORY_FIELDS;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/add", post(add_category))
        .route(
            "/categories/{id}",
            get(get_category).patch(edit_category).delete(delete_category),
        )
        .route("/categories/{id}/books", get(books_in_category))
}

fn admin(session: &Option<Extension<Session>>) -> Result<(), ServiceError> {
    require_admin(session.as_ref().map(|e| &e.0))
}

async fn list_categories(
    State(service): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(ok(service.list_categories()?))
}

async fn get_category(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(ok(service.get_category(&id)?))
}

async fn books_in_category(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(ok(service.list_books_in_category(&id)?))
}

async fn add_category(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, CATEGORY_FIELDS)?;
    let category = service.create_category(doc)?;
    info!(category = %category.id, slug = %category.slug, "category created");
    Ok(ok(category))
}

async fn edit_category(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, CATEGORY_FIELDS)?;
    let category = service.update_category(&id, doc)?;
    info!(category = %category.id, "category updated");
    Ok(ok(category))
}

async fn delete_category(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    service.delete_category(&id)?;
    info!(category = %id, "category deleted");
    Ok(ok(serde_json::json!({ "id": id })))
}
