//! Project entry document schema
//!
//! One unit of work reported for a member in a given month. Many entries
//! per member per month are allowed; insertion order is the display order
//! before severity ranking.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for project entries
pub const PROJECT_COLLECTION: &str = "projects";

/// Project entry document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProjectDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Member this entry belongs to (MemberDoc ObjectId hex)
    pub member_id: String,

    /// Month key, format "YYYY-MM"
    pub month_key: String,

    /// Project name
    pub name: String,

    /// Raw status string ("GREEN", "YELLOW", "RED"). Unrecognized values
    /// are kept verbatim and bucketed to Unknown at aggregation time; a
    /// missing field becomes "" instead of failing the row.
    #[serde(default)]
    pub status: String,

    /// Progress narrative, passed through verbatim
    #[serde(default)]
    pub description: String,
}

impl ProjectDoc {
    /// Create a new project entry
    pub fn new(
        member_id: String,
        month_key: String,
        name: String,
        status: String,
        description: String,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            member_id,
            month_key,
            name,
            status,
            description,
        }
    }
}

impl IntoIndexes for ProjectDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "member_id": 1, "month_key": 1 },
            Some(
                IndexOptions::builder()
                    .name("member_month_index".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ProjectDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::status::ProjectStatus;

    #[test]
    fn test_missing_status_deserializes_to_unknown_bucket() {
        // A row written without status/description must still load
        let raw = doc! {
            "member_id": "abc123",
            "month_key": "2026-01",
            "name": "Orphaned Project",
        };
        let row: ProjectDoc = bson::from_document(raw).unwrap();
        assert_eq!(row.status, "");
        assert_eq!(row.description, "");
        assert_eq!(
            ProjectStatus::from_row_value(&row.status),
            ProjectStatus::Unknown
        );
    }
}
