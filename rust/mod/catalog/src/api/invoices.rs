//! Invoice endpoints. All admin-only; invoices come from the
//! storefront, the dashboard only inspects and patches them.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::info;

use bookstore_core::{ok, require_admin, ServiceError, Session};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices/{id}", get(get_invoice).put(update_invoice))
}

fn admin(session: &Option<Extension<Session>>) -> Result<(), ServiceError> {
    require_admin(session.as_ref().map(|e| &e.0))
}

async fn list_invoices(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    Ok(ok(service.list_invoices()?))
}

async fn get_invoice(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    Ok(ok(service.get_invoice(&id)?))
}

/// Partial JSON update, typically `{"paymentStatus": "paid"}`.
async fn update_invoice(
    State(service): State<AppState>,
    session: Option<Extension<Session>>,
    Path(id): Path<String>,
    Json(doc): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<impl IntoResponse, ServiceError> {
    admin(&session)?;
    let view = service.update_invoice(&id, doc)?;
    info!(invoice = %view.id, status = %view.payment_status.as_str(), "invoice updated");
    Ok(ok(view))
}
