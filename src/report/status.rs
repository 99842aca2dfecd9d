//! Project status severity buckets
//!
//! Stored rows carry the raw traffic-light strings ("GREEN", "YELLOW",
//! "RED"). Anything else - including statuses added by future clients -
//! lands in the Unknown bucket instead of failing the row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display status of a project entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    OnTrack,
    AtRisk,
    Critical,
    /// Unrecognized or missing status string (display-only bucket)
    Unknown,
}

impl ProjectStatus {
    /// Map a raw stored status string to a severity bucket
    pub fn from_row_value(raw: &str) -> Self {
        match raw {
            "GREEN" => ProjectStatus::OnTrack,
            "YELLOW" => ProjectStatus::AtRisk,
            "RED" => ProjectStatus::Critical,
            _ => ProjectStatus::Unknown,
        }
    }

    /// Numeric display rank: lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            ProjectStatus::Critical => 1,
            ProjectStatus::AtRisk => 2,
            ProjectStatus::OnTrack => 3,
            ProjectStatus::Unknown => 4,
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::OnTrack => "On Track",
            ProjectStatus::AtRisk => "At Risk",
            ProjectStatus::Critical => "Critical",
            ProjectStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_value_mapping() {
        assert_eq!(ProjectStatus::from_row_value("GREEN"), ProjectStatus::OnTrack);
        assert_eq!(ProjectStatus::from_row_value("YELLOW"), ProjectStatus::AtRisk);
        assert_eq!(ProjectStatus::from_row_value("RED"), ProjectStatus::Critical);
        assert_eq!(ProjectStatus::from_row_value("PURPLE"), ProjectStatus::Unknown);
        assert_eq!(ProjectStatus::from_row_value(""), ProjectStatus::Unknown);
        // Case-sensitive on purpose: stored values are uppercase
        assert_eq!(ProjectStatus::from_row_value("green"), ProjectStatus::Unknown);
    }

    #[test]
    fn test_rank_order() {
        assert!(ProjectStatus::Critical.rank() < ProjectStatus::AtRisk.rank());
        assert!(ProjectStatus::AtRisk.rank() < ProjectStatus::OnTrack.rank());
        assert!(ProjectStatus::OnTrack.rank() < ProjectStatus::Unknown.rank());
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_string(&ProjectStatus::OnTrack).unwrap();
        assert_eq!(json, "\"ON_TRACK\"");
        let back: ProjectStatus = serde_json::from_str("\"AT_RISK\"").unwrap();
        assert_eq!(back, ProjectStatus::AtRisk);
    }
}
