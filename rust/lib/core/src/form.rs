//! Form normalization — the shared contract for add/edit operations.
//!
//! Submitted forms arrive as flat string fields. Each resource declares
//! a coercion table (`&[FieldDef]`) naming the fields it accepts and how
//! to parse them; everything else happens here:
//!
//! - fields not in the table are dropped at the boundary,
//! - empty submitted values are omitted (partial-update semantics),
//! - numeric fields are parsed and range-checked,
//! - create operations then assert their required set via [`require`].

use axum::extract::Multipart;

use crate::ServiceError;

/// How a form field is coerced into the update document.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Kept as a string.
    Text,
    /// Non-negative f64 (prices are stored in VND, so fractions are
    /// rare but legal).
    Price,
    /// Non-negative i64 (stock, quantity).
    Count,
    /// Plain i64 (published year).
    Year,
}

/// One entry of a resource's coercion table.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Drain a multipart form into (name, value) pairs.
///
/// File parts without a field name are skipped; values are read as
/// UTF-8 text.
pub async fn collect_form(
    mut multipart: Multipart,
) -> Result<Vec<(String, String)>, ServiceError> {
    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(format!("malformed form: {}", e)))?
    {
        let name = match field.name() {
            Some(n) => n.to_string(),
            None => continue,
        };
        let value = field
            .text()
            .await
            .map_err(|e| ServiceError::Validation(format!("unreadable form field '{}': {}", name, e)))?;
        fields.push((name, value));
    }
    Ok(fields)
}

/// Build a partial-update document from submitted fields.
///
/// Only fields listed in `table` survive; empty values are omitted so
/// an edit form that leaves an input blank does not overwrite the
/// stored value.
pub fn normalize(
    fields: &[(String, String)],
    table: &[FieldDef],
) -> Result<serde_json::Map<String, serde_json::Value>, ServiceError> {
    let mut doc = serde_json::Map::new();
    for (name, raw) in fields {
        let Some(def) = table.iter().find(|d| d.name == name) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value = match def.kind {
            FieldKind::Text => serde_json::Value::String(raw.to_string()),
            FieldKind::Price => {
                let n: f64 = raw.parse().map_err(|_| {
                    ServiceError::Validation(format!("field '{}' must be a number", def.name))
                })?;
                if n < 0.0 {
                    return Err(ServiceError::Validation(format!(
                        "field '{}' must not be negative",
                        def.name
                    )));
                }
                serde_json::json!(n)
            }
            FieldKind::Count => {
                let n: i64 = raw.parse().map_err(|_| {
                    ServiceError::Validation(format!("field '{}' must be an integer", def.name))
                })?;
                if n < 0 {
                    return Err(ServiceError::Validation(format!(
                        "field '{}' must not be negative",
                        def.name
                    )));
                }
                serde_json::json!(n)
            }
            FieldKind::Year => {
                let n: i64 = raw.parse().map_err(|_| {
                    ServiceError::Validation(format!("field '{}' must be a year", def.name))
                })?;
                serde_json::json!(n)
            }
        };
        doc.insert(def.name.to_string(), value);
    }
    Ok(doc)
}

/// Create-time required-field check.
pub fn require(
    doc: &serde_json::Map<String, serde_json::Value>,
    required: &[&str],
) -> Result<(), ServiceError> {
    for name in required {
        if !doc.contains_key(*name) {
            return Err(ServiceError::Validation(format!(
                "missing required field '{}'",
                name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[FieldDef] = &[
        FieldDef { name: "title", kind: FieldKind::Text },
        FieldDef { name: "price", kind: FieldKind::Price },
        FieldDef { name: "stock", kind: FieldKind::Count },
        FieldDef { name: "publishedYear", kind: FieldKind::Year },
    ];

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn coerces_by_kind() {
        let doc = normalize(
            &fields(&[("title", "Dune"), ("price", "100000"), ("stock", "5"), ("publishedYear", "1965")]),
            TABLE,
        )
        .unwrap();
        assert_eq!(doc["title"], "Dune");
        assert_eq!(doc["price"], 100000.0);
        assert_eq!(doc["stock"], 5);
        assert_eq!(doc["publishedYear"], 1965);
    }

    #[test]
    fn empty_values_are_omitted() {
        let doc = normalize(&fields(&[("title", ""), ("price", "  "), ("stock", "3")]), TABLE).unwrap();
        assert!(!doc.contains_key("title"));
        assert!(!doc.contains_key("price"));
        assert_eq!(doc["stock"], 3);
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let doc = normalize(&fields(&[("title", "Dune"), ("role", "admin")]), TABLE).unwrap();
        assert!(!doc.contains_key("role"));
    }

    #[test]
    fn bad_number_is_a_validation_error() {
        let err = normalize(&fields(&[("price", "abc")]), TABLE).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = normalize(&fields(&[("stock", "2.5")]), TABLE).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn negative_price_and_stock_are_rejected() {
        assert!(normalize(&fields(&[("price", "-1")]), TABLE).is_err());
        assert!(normalize(&fields(&[("stock", "-3")]), TABLE).is_err());
    }

    #[test]
    fn require_reports_the_first_missing_field() {
        let doc = normalize(&fields(&[("price", "10")]), TABLE).unwrap();
        let err = require(&doc, &["title", "price"]).unwrap_err();
        assert_eq!(err.to_string(), "missing required field 'title'");
        assert!(require(&doc, &["price"]).is_ok());
    }
}
