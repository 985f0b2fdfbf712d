//! Dashboard overview endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};

use bookstore_core::{ok, require_admin, ServiceError, Session};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/overview", get(overview))
}

async fn overview(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
) -> Result<impl IntoResponse, ServiceError> {
    require_admin(session.as_ref().map(|e| &e.0))?;
    Ok(ok(service.overview()?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::api::testing::{admin_session, app_with, envelope, get, user_session};

    #[tokio::test]
    async fn requires_the_admin_role() {
        let (app, _) = app_with(Some(user_session()));
        let response = app.oneshot(get("/overview")).await.unwrap();
        let body = envelope(response, StatusCode::FORBIDDEN).await;
        assert_eq!(body["error"]["kind"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn empty_overview_shape() {
        let (app, _) = app_with(Some(admin_session()));
        let response = app.oneshot(get("/overview")).await.unwrap();
        let body = envelope(response, StatusCode::OK).await;
        assert_eq!(body["data"]["bookCount"], 0);
        assert_eq!(body["data"]["totalStock"], 0);
        assert!(body["data"]["recentBooks"].as_array().unwrap().is_empty());
        assert!(body["data"]["booksByCategory"].as_array().unwrap().is_empty());
    }
}
