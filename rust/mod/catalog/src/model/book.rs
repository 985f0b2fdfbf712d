use serde::{Deserialize, Serialize};

/// A stored book record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,

    pub title: String,

    pub author: String,

    pub description: String,

    /// VND; fractions are legal but rare.
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub stock: i64,

    /// Owning category. Dangling references are tolerated on read
    /// (the populated `category` comes back null).
    pub category_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,

    pub created_at: String,
    pub updated_at: String,
}

/// Category stub embedded in populated book responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

/// A book as read endpoints return it: the record plus its category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub category: Option<CategoryRef>,
}
