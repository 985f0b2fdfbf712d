//! Category CRUD.

use serde_json::Map;

use bookstore_core::{apply_patch, new_id, now_rfc3339, require, FieldDef, FieldKind, ServiceError};
use bookstore_sql::Value;

use crate::model::Category;
use crate::service::{slug::slugify, store_err, CatalogService};

/// Coercion table for category add/edit forms. The slug is derived,
/// never submitted.
pub const CATEGORY_FIELDS: &[FieldDef] = &[
    FieldDef { name: "name", kind: FieldKind::Text },
    FieldDef { name: "description", kind: FieldKind::Text },
];

const CATEGORY_REQUIRED: &[&str] = &["name", "description"];

fn index_columns(category: &Category) -> [(&'static str, Value); 4] {
    [
        ("name", Value::Text(category.name.clone())),
        ("slug", Value::Text(category.slug.clone())),
        ("created_at", Value::Text(category.created_at.clone())),
        ("updated_at", Value::Text(category.updated_at.clone())),
    ]
}

impl CatalogService {
    pub fn create_category(
        &self,
        mut doc: Map<String, serde_json::Value>,
    ) -> Result<Category, ServiceError> {
        require(&doc, CATEGORY_REQUIRED)?;

        let name = doc
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(ServiceError::Validation(
                "category name must contain at least one letter or digit".into(),
            ));
        }

        let now = now_rfc3339();
        doc.insert("id".into(), serde_json::Value::String(new_id()));
        doc.insert("slug".into(), serde_json::Value::String(slug));
        doc.insert("createdAt".into(), serde_json::Value::String(now.clone()));
        doc.insert("updatedAt".into(), serde_json::Value::String(now));
        let category: Category = serde_json::from_value(serde_json::Value::Object(doc))
            .map_err(|e| ServiceError::Validation(format!("invalid category: {}", e)))?;

        self.categories()
            .insert(&category.id, &category, &index_columns(&category))
            .map_err(store_err)?;
        Ok(category)
    }

    pub fn get_category(&self, id: &str) -> Result<Category, ServiceError> {
        self.categories().fetch(id).map_err(store_err)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.categories().list(Some("name")).map_err(store_err)
    }

    /// Partial update. The slug stays as derived at create time even
    /// when the name changes, so existing storefront links keep working.
    pub fn update_category(
        &self,
        id: &str,
        doc: Map<String, serde_json::Value>,
    ) -> Result<Category, ServiceError> {
        let current: Category = self.categories().fetch(id).map_err(store_err)?;
        let updated: Category = apply_patch(&current, doc, &current.id, &current.created_at)?;
        self.categories()
            .update(id, &updated, &index_columns(&updated))
            .map_err(store_err)?;
        Ok(updated)
    }

    /// Refuses to delete a category that still owns books; the caller
    /// must move or delete them first.
    pub fn delete_category(&self, id: &str) -> Result<(), ServiceError> {
        let referencing = self
            .books()
            .count_where("category_id", Value::Text(id.to_string()))
            .map_err(store_err)?;
        if referencing > 0 {
            return Err(ServiceError::Conflict(format!(
                "category '{}' still has {} book(s)",
                id, referencing
            )));
        }
        self.categories().delete(id).map_err(store_err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bookstore_core::{error_kind, normalize};
    use bookstore_sql::SqliteStore;

    use super::*;
    use crate::service::book::BOOK_FIELDS;

    fn service() -> Arc<CatalogService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        CatalogService::new(sql).unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> Map<String, serde_json::Value> {
        let fields: Vec<(String, String)> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        normalize(&fields, CATEGORY_FIELDS).unwrap()
    }

    #[test]
    fn create_derives_the_slug() {
        let svc = service();
        let category = svc
            .create_category(form(&[("name", "Công Nghệ"), ("description", "tech")]))
            .unwrap();
        assert_eq!(category.slug, "cong-nghe");
    }

    #[test]
    fn create_requires_name_and_description() {
        let svc = service();
        let err = svc.create_category(form(&[("name", "Solo")])).unwrap_err();
        assert_eq!(err.kind(), error_kind::VALIDATION);
        assert!(svc.list_categories().unwrap().is_empty());
    }

    #[test]
    fn unsluggable_name_is_rejected() {
        let svc = service();
        let err = svc
            .create_category(form(&[("name", "!!!"), ("description", "x")]))
            .unwrap_err();
        assert_eq!(err.kind(), error_kind::VALIDATION);
    }

    #[test]
    fn rename_keeps_the_original_slug() {
        let svc = service();
        let category = svc
            .create_category(form(&[("name", "Fiction"), ("description", "x")]))
            .unwrap();
        let updated = svc
            .update_category(&category.id, form(&[("name", "Literary Fiction")]))
            .unwrap();
        assert_eq!(updated.name, "Literary Fiction");
        assert_eq!(updated.slug, "fiction");
    }

    #[test]
    fn delete_is_blocked_while_books_reference_it() {
        let svc = service();
        let category = svc
            .create_category(form(&[("name", "Fiction"), ("description", "x")]))
            .unwrap();

        let book_doc = normalize(
            &[
                ("title".to_string(), "Dune".to_string()),
                ("author".to_string(), "Frank Herbert".to_string()),
                ("description".to_string(), "x".to_string()),
                ("price".to_string(), "1000".to_string()),
                ("stock".to_string(), "1".to_string()),
                ("categoryId".to_string(), category.id.clone()),
            ],
            BOOK_FIELDS,
        )
        .unwrap();
        let book = svc.create_book(book_doc).unwrap();

        let err = svc.delete_category(&category.id).unwrap_err();
        assert_eq!(err.kind(), error_kind::CONFLICT);

        svc.delete_book(&book.book.id).unwrap();
        svc.delete_category(&category.id).unwrap();
        let err = svc.delete_category(&category.id).unwrap_err();
        assert_eq!(err.kind(), error_kind::NOT_FOUND);
    }
}
