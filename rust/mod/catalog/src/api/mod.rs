mod books;
mod categories;
mod invoices;
mod overview;

use std::sync::Arc;

use axum::Router;

use crate::service::CatalogService;

pub(crate) type AppState = Arc<CatalogService>;

pub fn build_router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .merge(books::routes())
        .merge(categories::routes())
        .merge(invoices::routes())
        .merge(overview::routes())
        .with_state(service)
}
