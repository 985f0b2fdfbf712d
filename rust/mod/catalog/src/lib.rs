//! Catalog module — books, categories, invoices, overview statistics.
//!
//! # Resources
//!
//! - **Book** — priced, stocked item owned by one category
//! - **Category** — named group with a slug derived from the name
//! - **Invoice** — order record created by the storefront; the
//!   dashboard only reads and patches it (payment status updates)
//!
//! Reads populate cross-references (book → category name, invoice →
//! user and book titles) so the dashboard never has to join client-side.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use bookstore_core::Module;

use crate::service::CatalogService;

/// Catalog module implementing the Module trait.
pub struct CatalogModule {
    service: Arc<CatalogService>,
}

impl CatalogModule {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<CatalogService> {
        &self.service
    }
}

impl Module for CatalogModule {
    fn name(&self) -> &str {
        "catalog"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
