use serde::{Deserialize, Serialize};

/// Payment lifecycle. No ordering constraints between states; the
/// dashboard may move an invoice in any direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Banking,
    Momo,
    Zalopay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub book_id: String,
    /// At least 1; the storefront enforces this at order time.
    pub quantity: i64,
    /// Unit price captured at order time, independent of the book's
    /// current price.
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A stored invoice record. Created by the storefront; the dashboard
/// only reads and patches (payment status, mostly).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    pub items: Vec<InvoiceItem>,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: String,
    pub updated_at: String,
}

/// User stub embedded in populated invoice responses. Decoded straight
/// from the users table's `data` column; extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Book stub embedded in populated invoice items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemView {
    #[serde(flatten)]
    pub item: InvoiceItem,
    pub book: Option<BookRef>,
}

/// An invoice as read endpoints return it: user and per-item book
/// stubs populated, null where the reference no longer resolves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub id: String,
    pub user_id: String,
    pub user: Option<UserRef>,
    pub items: Vec<InvoiceItemView>,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: String,
    pub updated_at: String,
}
