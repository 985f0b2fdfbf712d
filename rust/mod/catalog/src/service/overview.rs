//! Dashboard overview statistics, computed with SQL aggregates over
//! the indexed columns.

use serde::Serialize;

use bookstore_core::ServiceError;
use bookstore_sql::Value;

use crate::model::{Book, Category};
use crate::service::{store_err, CatalogService};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub book_count: i64,
    pub category_count: i64,
    pub average_price: f64,
    pub total_stock: i64,
    /// The 6 newest books.
    pub recent_books: Vec<RecentBook>,
    /// Per-category book counts, largest first.
    pub books_by_category: Vec<CategoryCount>,
}

impl CatalogService {
    pub fn overview(&self) -> Result<Overview, ServiceError> {
        let stats = self
            .sql
            .query(
                "SELECT COUNT(*) AS cnt, AVG(price) AS avg_price, SUM(stock) AS total_stock
                 FROM books",
                &[],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let (book_count, average_price, total_stock) = match stats.first() {
            Some(row) => (
                row.integer("cnt").unwrap_or(0),
                row.real("avg_price").unwrap_or(0.0),
                row.integer("total_stock").unwrap_or(0),
            ),
            None => (0, 0.0, 0),
        };

        let recent: Vec<Book> = self
            .sql
            .query(
                "SELECT data FROM books ORDER BY created_at DESC LIMIT 6",
                &[],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?
            .iter()
            .filter_map(|row| serde_json::from_str(row.text("data")?).ok())
            .collect();
        let recent_books = recent
            .into_iter()
            .map(|b| RecentBook { id: b.id, title: b.title, author: b.author, price: b.price })
            .collect();

        let categories: Vec<Category> = self.categories().list(Some("name")).map_err(store_err)?;
        let mut books_by_category = Vec::with_capacity(categories.len());
        for category in categories {
            let count = self
                .books()
                .count_where("category_id", Value::Text(category.id.clone()))
                .map_err(store_err)?;
            books_by_category.push(CategoryCount {
                id: category.id,
                name: category.name,
                slug: category.slug,
                count,
            });
        }
        books_by_category.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(Overview {
            book_count,
            category_count: books_by_category.len() as i64,
            average_price,
            total_stock,
            recent_books,
            books_by_category,
        })
    }
}
