use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ServiceError;

/// Generate a new record id (UUIDv4 with the dashes stripped).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Merge a JSON patch into a base value (RFC 7386 semantics).
///
/// For each key in `patch`: `null` removes the key, nested objects
/// merge recursively, everything else overwrites.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    match (base.as_object_mut(), patch.as_object()) {
        (Some(base_obj), Some(patch_obj)) => {
            for (key, value) in patch_obj {
                if value.is_null() {
                    base_obj.remove(key);
                } else if value.is_object() {
                    let slot = base_obj
                        .entry(key.clone())
                        .or_insert_with(|| serde_json::Value::Object(Default::default()));
                    merge_patch(slot, value);
                } else {
                    base_obj.insert(key.clone(), value.clone());
                }
            }
        }
        _ => *base = patch.clone(),
    }
}

/// Apply a normalized partial-update document to a stored record.
///
/// `id` and `createdAt` are pinned to the stored values and `updatedAt`
/// is forced to now, so a submitted form can never rewrite them. The
/// merged value is deserialized back into `T`, which is where enum
/// fields (role, payment status, ...) get validated.
pub fn apply_patch<T>(
    current: &T,
    patch: serde_json::Map<String, serde_json::Value>,
    id: &str,
    created_at: &str,
) -> Result<T, ServiceError>
where
    T: Serialize + DeserializeOwned,
{
    let mut base = serde_json::to_value(current)
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    merge_patch(&mut base, &serde_json::Value::Object(patch));
    base["id"] = serde_json::json!(id);
    base["createdAt"] = serde_json::json!(created_at);
    base["updatedAt"] = serde_json::json!(now_rfc3339());
    serde_json::from_value(base)
        .map_err(|e| ServiceError::Validation(format!("invalid update payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn new_id_has_no_dashes() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn now_is_rfc3339() {
        assert!(now_rfc3339().contains('T'));
    }

    #[test]
    fn merge_patch_overwrites_removes_and_recurses() {
        let mut base = serde_json::json!({"a": 1, "b": 2, "c": {"d": 3}});
        let patch = serde_json::json!({"b": null, "c": {"e": 4}, "f": 5});
        merge_patch(&mut base, &patch);
        assert_eq!(base, serde_json::json!({"a": 1, "c": {"d": 3, "e": 4}, "f": 5}));
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Record {
        id: String,
        title: String,
        price: f64,
        created_at: String,
        updated_at: String,
    }

    #[test]
    fn apply_patch_updates_only_submitted_fields() {
        let current = Record {
            id: "r1".into(),
            title: "before".into(),
            price: 100.0,
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        };
        let mut patch = serde_json::Map::new();
        patch.insert("price".into(), serde_json::json!(200000.0));

        let updated = apply_patch(&current, patch, "r1", "2026-01-01T00:00:00Z").unwrap();
        assert_eq!(updated.price, 200000.0);
        assert_eq!(updated.title, "before");
        assert_eq!(updated.created_at, "2026-01-01T00:00:00Z");
        assert_ne!(updated.updated_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn apply_patch_pins_id_and_created_at() {
        let current = Record {
            id: "r1".into(),
            title: "t".into(),
            price: 1.0,
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        };
        let mut patch = serde_json::Map::new();
        patch.insert("id".into(), serde_json::json!("evil"));
        patch.insert("createdAt".into(), serde_json::json!("1970-01-01T00:00:00Z"));

        let updated = apply_patch(&current, patch, "r1", "2026-01-01T00:00:00Z").unwrap();
        assert_eq!(updated.id, "r1");
        assert_eq!(updated.created_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn apply_patch_rejects_type_mismatch() {
        let current = Record {
            id: "r1".into(),
            title: "t".into(),
            price: 1.0,
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        };
        let mut patch = serde_json::Map::new();
        patch.insert("price".into(), serde_json::json!("not a number"));

        let err = apply_patch(&current, patch, "r1", "2026-01-01T00:00:00Z").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
