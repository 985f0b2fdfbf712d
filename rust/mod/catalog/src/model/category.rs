use serde::{Deserialize, Serialize};

/// A stored category record. The slug is derived from the name at
/// create time and kept stable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}
