//! Book endpoints. Reads are public (the storefront uses them);
//! mutations are admin-only.

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tracing::info;

use bookstore_core::{collect_form, normalize, ok, require_admin, ServiceError, Session};

use crate::api::AppState;
use crate::service::book::BOOK_FIELDS;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/add", post(add_book))
        .route(
            "/books/{id}",
            get(get_book).patch(edit_book).delete(delete_book),
        )
}

fn admin(session: &Option<Extension<Session>>) -> Result<(), ServiceError> {
    require_admin(session.as_ref().map(|e| &e.0))
}

async fn list_books(State(service): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    Ok(ok(service.list_books()?))
}

async fn get_book(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(ok(service.get_book(&id)?))
}

async fn add_book(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, BOOK_FIELDS)?;
    let view = service.create_book(doc)?;
    info!(book = %view.book.id, title = %view.book.title, "book created");
    Ok(ok(view))
}

async fn edit_book(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let fields = collect_form(multipart).await?;
    let doc = normalize(&fields, BOOK_FIELDS)?;
    let view = service.update_book(&id, doc)?;
    info!(book = %view.book.id, "book updated");
    Ok(ok(view))
}

async fn delete_book(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    service.delete_book(&id)?;
    info!(book = %id, "book deleted");
    Ok(ok(serde_json::json!({ "id": id })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::api::testing::{admin_session, app_with, envelope, form_request, get, user_session};

    fn book_fields<'a>(category_id: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("title", "Dune"),
            ("author", "Frank Herbert"),
            ("description", "Sci-fi classic"),
            ("price", "150000"),
            ("stock", "4"),
            ("categoryId", category_id),
        ]
    }

    #[tokio::test]
    async fn reads_are_public_but_mutations_are_not() {
        let (app, _) = app_with(None);

        let response = app.clone().oneshot(get("/books")).await.unwrap();
        envelope(response, StatusCode::OK).await;

        let response = app
            .oneshot(form_request("/books/add", "POST", &book_fields("c1")))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::UNAUTHORIZED).await;
        assert_eq!(body["error"]["kind"], "UNAUTHENTICATED");

        let (app, _) = app_with(Some(user_session()));
        let response = app
            .oneshot(form_request("/books/add", "POST", &book_fields("c1")))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::FORBIDDEN).await;
        assert_eq!(body["error"]["kind"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn full_crud_with_populated_category() {
        let (app, service) = app_with(Some(admin_session()));

        let category = {
            let doc = bookstore_core::normalize(
                &[
                    ("name".to_string(), "Fiction".to_string()),
                    ("description".to_string(), "x".to_string()),
                ],
                crate::service::category::CATEGORY_FIELDS,
            )
            .unwrap();
            service.create_category(doc).unwrap()
        };
        assert_eq!(category.slug, "fiction");

        let response = app
            .clone()
            .oneshot(form_request("/books/add", "POST", &book_fields(&category.id)))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["category"]["name"], "Fiction");

        // Partial edit changes stock only.
        let response = app
            .clone()
            .oneshot(form_request(&format!("/books/{}", id), "PATCH", &[("stock", "3")]))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["data"]["stock"], 3);
        assert_eq!(body["data"]["title"], "Dune");
        assert_eq!(body["data"]["price"], 150000.0);

        let response = app
            .clone()
            .oneshot(get(&format!("/categories/{}/books", category.id)))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .method("DELETE")
                    .uri(format!("/books/{}", id))
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        envelope(response, StatusCode::OK).await;

        // Re-delete is NOT_FOUND, never silent success.
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("DELETE")
                    .uri(format!("/books/{}", id))
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = envelope(response, StatusCode::NOT_FOUND).await;
        assert_eq!(body["error"]["kind"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn add_with_missing_required_field_is_400() {
        let (app, service) = app_with(Some(admin_session()));
        let response = app
            .oneshot(form_request("/books/add", "POST", &[("title", "Orphan")]))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::BAD_REQUEST).await;
        assert_eq!(body["error"]["kind"], "VALIDATION");
        assert!(service.list_books().unwrap().is_empty());
    }
}
