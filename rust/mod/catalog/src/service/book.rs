//! Book CRUD with category population.

use std::collections::HashMap;

use serde_json::Map;

use bookstore_core::{apply_patch, new_id, now_rfc3339, require, FieldDef, FieldKind, ServiceError};
use bookstore_sql::Value;

use crate::model::{Book, BookView, Category, CategoryRef};
use crate::service::{store_err, CatalogService};

/// Coercion table for book add/edit forms.
pub const BOOK_FIELDS: &[FieldDef] = &[
    FieldDef { name: "title", kind: FieldKind::Text },
    FieldDef { name: "author", kind: FieldKind::Text },
    FieldDef { name: "description", kind: FieldKind::Text },
    FieldDef { name: "price", kind: FieldKind::Price },
    FieldDef { name: "imageUrl", kind: FieldKind::Text },
    FieldDef { name: "stock", kind: FieldKind::Count },
    FieldDef { name: "categoryId", kind: FieldKind::Text },
    FieldDef { name: "publishedYear", kind: FieldKind::Year },
];

const BOOK_REQUIRED: &[&str] = &["title", "author", "categoryId", "price", "stock", "description"];

fn index_columns(book: &Book) -> [(&'static str, Value); 7] {
    [
        ("title", Value::Text(book.title.clone())),
        ("author", Value::Text(book.author.clone())),
        ("price", Value::Real(book.price)),
        ("stock", Value::Integer(book.stock)),
        ("category_id", Value::Text(book.category_id.clone())),
        ("created_at", Value::Text(book.created_at.clone())),
        ("updated_at", Value::Text(book.updated_at.clone())),
    ]
}

impl CatalogService {
    pub fn create_book(&self, mut doc: Map<String, serde_json::Value>) -> Result<BookView, ServiceError> {
        require(&doc, BOOK_REQUIRED)?;

        let now = now_rfc3339();
        doc.insert("id".into(), serde_json::Value::String(new_id()));
        doc.insert("createdAt".into(), serde_json::Value::String(now.clone()));
        doc.insert("updatedAt".into(), serde_json::Value::String(now));
        let book: Book = serde_json::from_value(serde_json::Value::Object(doc))
            .map_err(|e| ServiceError::Validation(format!("invalid book: {}", e)))?;

        self.books()
            .insert(&book.id, &book, &index_columns(&book))
            .map_err(store_err)?;
        Ok(self.populate_book(book))
    }

    pub fn get_book(&self, id: &str) -> Result<BookView, ServiceError> {
        let book: Book = self.books().fetch(id).map_err(store_err)?;
        Ok(self.populate_book(book))
    }

    /// Newest first, every record populated with its category stub.
    pub fn list_books(&self) -> Result<Vec<BookView>, ServiceError> {
        let books: Vec<Book> = self
            .books()
            .list(Some("created_at DESC"))
            .map_err(store_err)?;
        let names = self.category_names()?;
        Ok(books
            .into_iter()
            .map(|b| populate_from(b, &names))
            .collect())
    }

    /// Books belonging to one category. 404s on an unknown category so
    /// the dashboard can distinguish "empty" from "gone".
    pub fn list_books_in_category(&self, category_id: &str) -> Result<Vec<BookView>, ServiceError> {
        let category: Category = self.categories().fetch(category_id).map_err(store_err)?;
        let books: Vec<Book> = self
            .books()
            .list_where(
                "category_id",
                Value::Text(category_id.to_string()),
                Some("created_at DESC"),
            )
            .map_err(store_err)?;
        let stub = CategoryRef { id: category.id, name: category.name };
        Ok(books
            .into_iter()
            .map(|book| BookView { book, category: Some(stub.clone()) })
            .collect())
    }

    pub fn update_book(
        &self,
        id: &str,
        doc: Map<String, serde_json::Value>,
    ) -> Result<BookView, ServiceError> {
        let current: Book = self.books().fetch(id).map_err(store_err)?;
        let updated: Book = apply_patch(&current, doc, &current.id, &current.created_at)?;
        self.books()
            .update(id, &updated, &index_columns(&updated))
            .map_err(store_err)?;
        Ok(self.populate_book(updated))
    }

    pub fn delete_book(&self, id: &str) -> Result<(), ServiceError> {
        self.books().delete(id).map_err(store_err)
    }

    fn populate_book(&self, book: Book) -> BookView {
        let category = self
            .categories()
            .fetch::<Category>(&book.category_id)
            .ok()
            .map(|c| CategoryRef { id: c.id, name: c.name });
        BookView { book, category }
    }

    pub(crate) fn category_names(&self) -> Result<HashMap<String, String>, ServiceError> {
        let categories: Vec<Category> = self.categories().list(None).map_err(store_err)?;
        Ok(categories.into_iter().map(|c| (c.id, c.name)).collect())
    }
}

fn populate_from(book: Book, names: &HashMap<String, String>) -> BookView {
    let category = names
        .get(&book.category_id)
        .map(|name| CategoryRef { id: book.category_id.clone(), name: name.clone() });
    BookView { book, category }
}
