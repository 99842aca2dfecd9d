//! Account document schema
//!
//! Stores login credentials. An account maps to a team member through the
//! member's `email` field; the member record itself stays credential-free.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for accounts
pub const ACCOUNT_COLLECTION: &str = "accounts";

/// Account document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AccountDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Login identifier (email)
    pub identifier: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Whether the account is active
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl AccountDoc {
    /// Create a new account document
    pub fn new(identifier: String, password_hash: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            identifier,
            password_hash,
            is_active: true,
        }
    }
}

impl IntoIndexes for AccountDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "identifier": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("identifier_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for AccountDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
