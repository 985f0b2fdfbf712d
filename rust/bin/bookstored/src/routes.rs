//! Route assembly — module routes under /api + system endpoints.

use std::sync::Arc;

use axum::middleware;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use bookstore_core::Module;

use crate::gate::{self, Gate};

/// Build the complete router. Module routers are merged into one tree
/// and nested under `/api`; the session gate wraps everything.
pub fn build_router(gate: Arc<Gate>, modules: &[&dyn Module]) -> Router {
    let mut api = Router::new();
    for module in modules {
        api = api.merge(module.routes());
    }

    Router::new()
        .route("/", get(index_page))
        .route("/login", get(login_page))
        .route("/dashboard", get(dashboard_page))
        .route("/health", get(health))
        .route("/version", get(version))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(gate, gate::session_gate))
}

// The dashboard client is a separate app; these pages are minimal
// stand-ins so the gate's redirect targets resolve.
async fn index_page() -> impl IntoResponse {
    Html("<!doctype html><title>Bookstore</title><p>Bookstore API server.</p>")
}

async fn login_page() -> impl IntoResponse {
    Html("<!doctype html><title>Login</title><p>POST /api/auth/login to obtain a session.</p>")
}

async fn dashboard_page() -> impl IntoResponse {
    Html("<!doctype html><title>Dashboard</title><p>Admin dashboard.</p>")
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "bookstored",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use bookstore_auth::service::{password, AuthConfig, AuthService};
    use bookstore_auth::AuthModule;
    use bookstore_catalog::service::CatalogService;
    use bookstore_catalog::CatalogModule;
    use bookstore_core::Role;
    use bookstore_sql::SqliteStore;

    use super::*;
    use crate::config::GateConfig;

    const BOUNDARY: &str = "test-boundary";

    fn server() -> Router {
        let sql: Arc<SqliteStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthService::new(sql.clone(), AuthConfig::default()).unwrap();
        let catalog = CatalogService::new(sql).unwrap();

        let hash = password::hash_password("root-pass").unwrap();
        auth.create_with_hash("Root", "root@example.com", &hash, Role::Admin, None, None)
            .unwrap();

        let gate = Arc::new(Gate { auth: auth.clone(), config: GateConfig::default() });
        let auth_module = AuthModule::new(auth);
        let catalog_module = CatalogModule::new(catalog);
        let modules: [&dyn Module; 2] = [&auth_module, &catalog_module];
        build_router(gate, &modules)
    }

    fn form_request(uri: &str, method: &str, token: &str, pairs: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in pairs {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn envelope(response: Response<Body>, expect: StatusCode) -> serde_json::Value {
        assert_eq!(response.status(), expect);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "email": "root@example.com",
                            "password": "root-pass",
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_and_version_are_public() {
        let app = server();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["name"], "bookstored");
    }

    #[tokio::test]
    async fn end_to_end_category_and_book_lifecycle() {
        let app = server();
        let token = login(&app).await;

        // Category "Fiction" gets slug "fiction".
        let response = app
            .clone()
            .oneshot(form_request(
                "/api/categories/add",
                "POST",
                &token,
                &[("name", "Fiction"), ("description", "Novels")],
            ))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["data"]["slug"], "fiction");
        let category_id = body["data"]["id"].as_str().unwrap().to_string();

        // A book referencing it lists populated with the category name.
        let response = app
            .clone()
            .oneshot(form_request(
                "/api/books/add",
                "POST",
                &token,
                &[
                    ("title", "Dune"),
                    ("author", "Frank Herbert"),
                    ("description", "Sci-fi classic"),
                    ("price", "150000"),
                    ("stock", "4"),
                    ("categoryId", &category_id),
                ],
            ))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        let book_id = body["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/books").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["data"][0]["category"]["name"], "Fiction");

        // Partial edit changes stock only.
        let response = app
            .clone()
            .oneshot(form_request(
                &format!("/api/books/{}", book_id),
                "PATCH",
                &token,
                &[("stock", "3")],
            ))
            .await
            .unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["data"]["stock"], 3);
        assert_eq!(body["data"]["title"], "Dune");
        assert_eq!(body["data"]["price"], 150000.0);

        // Delete removes; re-delete is NOT_FOUND.
        for expect in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("DELETE")
                        .uri(format!("/api/books/{}", book_id))
                        .header(header::AUTHORIZATION, format!("Bearer {}", token))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            envelope(response, expect).await;
        }
    }

    #[tokio::test]
    async fn mutations_without_a_session_are_rejected() {
        let app = server();
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/books/some-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = envelope(response, StatusCode::UNAUTHORIZED).await;
        assert_eq!(body["error"]["kind"], "UNAUTHENTICATED");
    }
}
