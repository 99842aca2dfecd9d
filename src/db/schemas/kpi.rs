//! Monthly KPI document schema
//!
//! One numeric performance measurement for a member in a given month, with
//! its explicit prior-month comparison value. Uniqueness per member+month
//! is not enforced here; the aggregator applies a last-write-wins fold.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for monthly KPI entries
pub const KPI_COLLECTION: &str = "monthly_kpis";

/// Monthly KPI document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct KpiDoc {
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

    /// Metric label (e.g. "Monthly Revenue (Juta Rp)", "Web Traffic")
    pub label: String,

    /// Measured value for this month
    pub value: f64,

    /// Value reported for the previous month
    pub previous_value: f64,
}

impl KpiDoc {
    /// Create a new KPI entry
    pub fn new(
        member_id: String,
        month_key: String,
        label: String,
        value: f64,
        previous_value: f64,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            member_id,
            month_key,
            label,
            value,
            previous_value,
        }
    }
}

impl IntoIndexes for KpiDoc {
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

impl MutMetadata for KpiDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
