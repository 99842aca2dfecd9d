//! Team member document schema
//!
//! Members are created by seeding or an admin action and never mutated by
//! the dashboard itself; the service only reads and reshapes them.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for team members
pub const MEMBER_COLLECTION: &str = "team_members";

/// Team member document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MemberDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Display name
    pub name: String,

    /// Role within the team (e.g. "CEO", "CMO")
    pub role: String,

    /// Avatar image URL
    pub avatar_url: String,

    /// Login email, links an authenticated account to this member.
    /// Optional: seeded members without credentials have no email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MemberDoc {
    /// Create a new member document
    pub fn new(name: String, role: String, avatar_url: String, email: Option<String>) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            role,
            avatar_url,
            email,
        }
    }

    /// Stable string identifier for this member (ObjectId hex)
    pub fn id_string(&self) -> String {
        self._id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

impl IntoIndexes for MemberDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "email": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .name("email_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for MemberDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
