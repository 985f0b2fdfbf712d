//! Invoice reads and partial updates.
//!
//! Invoices are created by the storefront checkout, which shares the
//! store; [`CatalogService::import_invoice`] is that ingestion point.
//! The dashboard lists, inspects, and patches them (payment status,
//! mostly).

use serde_json::Map;

use bookstore_core::{apply_patch, ServiceError};
use bookstore_sql::{Row, Value};

use crate::model::{Book, BookRef, Invoice, InvoiceItemView, InvoiceView, UserRef};
use crate::service::{store_err, CatalogService};

fn index_columns(invoice: &Invoice) -> [(&'static str, Value); 4] {
    [
        ("user_id", Value::Text(invoice.user_id.clone())),
        (
            "payment_status",
            Value::Text(invoice.payment_status.as_str().to_string()),
        ),
        ("created_at", Value::Text(invoice.created_at.clone())),
        ("updated_at", Value::Text(invoice.updated_at.clone())),
    ]
}

impl CatalogService {
    /// Persist an externally created invoice.
    pub fn import_invoice(&self, invoice: &Invoice) -> Result<(), ServiceError> {
        self.invoices()
            .insert(&invoice.id, invoice, &index_columns(invoice))
            .map_err(store_err)
    }

    pub fn get_invoice(&self, id: &str) -> Result<InvoiceView, ServiceError> {
        let invoice: Invoice = self.invoices().fetch(id).map_err(store_err)?;
        Ok(self.populate_invoice(invoice))
    }

    /// Newest first, user and book stubs populated.
    pub fn list_invoices(&self) -> Result<Vec<InvoiceView>, ServiceError> {
        let invoices: Vec<Invoice> = self
            .invoices()
            .list(Some("created_at DESC"))
            .map_err(store_err)?;
        Ok(invoices
            .into_iter()
            .map(|i| self.populate_invoice(i))
            .collect())
    }

    /// Partial JSON update. Enum membership of paymentStatus and
    /// paymentMethod is enforced by deserialization of the merged
    /// record; an unknown value fails as `VALIDATION` and nothing is
    /// written.
    pub fn update_invoice(
        &self,
        id: &str,
        doc: Map<String, serde_json::Value>,
    ) -> Result<InvoiceView, ServiceError> {
        let current: Invoice = self.invoices().fetch(id).map_err(store_err)?;
        let updated: Invoice = apply_patch(&current, doc, &current.id, &current.created_at)?;
        self.invoices()
            .update(id, &updated, &index_columns(&updated))
            .map_err(store_err)?;
        Ok(self.populate_invoice(updated))
    }

    fn populate_invoice(&self, invoice: Invoice) -> InvoiceView {
        let user = self.lookup_user(&invoice.user_id);
        let items = invoice
            .items
            .into_iter()
            .map(|item| {
                let book = self
                    .books()
                    .fetch::<Book>(&item.book_id)
                    .ok()
                    .map(|b| BookRef { id: b.id, title: b.title });
                InvoiceItemView { item, book }
            })
            .collect();
        InvoiceView {
            id: invoice.id,
            user_id: invoice.user_id,
            user,
            items,
            total_amount: invoice.total_amount,
            payment_status: invoice.payment_status,
            payment_method: invoice.payment_method,
            shipping_address: invoice.shipping_address,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }

    /// Read a user stub from the shared `users` table. Any failure
    /// (table absent, id unknown, undecodable record) populates null
    /// rather than failing the invoice read.
    fn lookup_user(&self, user_id: &str) -> Option<UserRef> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM users WHERE id = ?1",
                &[Value::Text(user_id.to_string())],
            )
            .ok()?;
        decode_user(rows.first()?)
    }
}

fn decode_user(row: &Row) -> Option<UserRef> {
    serde_json::from_str(row.text("data")?).ok()
}
