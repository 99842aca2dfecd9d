//! Report Aggregator
//!
//! Joins member, project, and KPI rows into a per-member, per-month nested
//! structure. Pure function over full snapshots: no caching, no incremental
//! update, recomputed from scratch on every call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::schemas::{KpiDoc, MemberDoc, ProjectDoc};
use crate::report::month::month_label;
use crate::report::status::ProjectStatus;

/// One unit of work reported for a member in a given month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub status: ProjectStatus,
    pub description: String,
}

/// One numeric performance measurement with its prior-month comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMetric {
    pub label: String,
    pub value: f64,
    pub previous_value: f64,
}

/// One point of a member's KPI history series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiHistoryPoint {
    /// Short calendar-month label ("Jan", "Feb", ...)
    pub month: String,
    pub value: f64,
}

/// The per-member, per-month bundle the dashboard displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MonthlyReport {
    pub projects: Vec<ProjectEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi: Option<KpiMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi_history: Option<Vec<KpiHistoryPoint>>,
}

/// A member with their accumulated monthly reports
///
/// Reports are keyed by month key; BTreeMap keeps serialized keys in
/// chronological order (lexical order equals chronological for "YYYY-MM").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub reports: BTreeMap<String, MonthlyReport>,
}

/// Join the three row sets into one MemberView per member row, preserving
/// the input member order.
///
/// Project entries keep their row order within a month; severity ranking is
/// a display concern handled separately. KPI folding is explicit
/// last-write-wins per (member, month): when duplicate month keys exist,
/// the later row in ascending month order replaces the earlier one's `kpi`,
/// while every row still contributes a history point.
///
/// The history series is member-global: each report that was touched by a
/// KPI row carries the identical, full series over ALL of that member's KPI
/// rows, not just rows up to the report's month. Downstream charts rely on
/// this, so it is preserved and pinned by test.
pub fn build_member_views(
    members: &[MemberDoc],
    projects: &[ProjectDoc],
    kpis: &[KpiDoc],
) -> Vec<MemberView> {
    members
        .iter()
        .map(|member| {
            let member_id = member.id_string();
            let mut reports: BTreeMap<String, MonthlyReport> = BTreeMap::new();

            // Projects per month, in row order
            for row in projects.iter().filter(|p| p.member_id == member_id) {
                let report = reports.entry(row.month_key.clone()).or_default();
                report.projects.push(ProjectEntry {
                    name: row.name.clone(),
                    status: ProjectStatus::from_row_value(&row.status),
                    description: row.description.clone(),
                });
            }

            // KPI rows per month, ascending month order (stable, so row
            // order breaks ties between duplicate month keys)
            let mut member_kpis: Vec<&KpiDoc> =
                kpis.iter().filter(|k| k.member_id == member_id).collect();
            member_kpis.sort_by(|a, b| a.month_key.cmp(&b.month_key));

            for row in &member_kpis {
                let report = reports.entry(row.month_key.clone()).or_default();
                // Last write wins for duplicate (member, month) keys
                report.kpi = Some(KpiMetric {
                    label: row.label.clone(),
                    value: row.value,
                    previous_value: row.previous_value,
                });
            }

            // Full member-global history, attached to every KPI-touched month
            if !member_kpis.is_empty() {
                let history: Vec<KpiHistoryPoint> = member_kpis
                    .iter()
                    .map(|row| KpiHistoryPoint {
                        month: month_label(&row.month_key),
                        value: row.value,
                    })
                    .collect();

                for row in &member_kpis {
                    if let Some(report) = reports.get_mut(&row.month_key) {
                        report.kpi_history = Some(history.clone());
                    }
                }
            }

            MemberView {
                id: member_id,
                name: member.name.clone(),
                role: member.role.clone(),
                avatar: member.avatar_url.clone(),
                reports,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn member(name: &str) -> MemberDoc {
        let mut m = MemberDoc::new(
            name.to_string(),
            "CEO".to_string(),
            format!("https://avatars.example/{name}"),
            None,
        );
        m._id = Some(ObjectId::new());
        m
    }

    fn project(member_id: &str, month: &str, name: &str, status: &str) -> ProjectDoc {
        ProjectDoc::new(
            member_id.to_string(),
            month.to_string(),
            name.to_string(),
            status.to_string(),
            "...".to_string(),
        )
    }

    fn kpi(member_id: &str, month: &str, label: &str, value: f64, prev: f64) -> KpiDoc {
        KpiDoc::new(
            member_id.to_string(),
            month.to_string(),
            label.to_string(),
            value,
            prev,
        )
    }

    #[test]
    fn test_member_with_no_rows_gets_empty_reports() {
        let members = vec![member("Iqbal")];
        let views = build_member_views(&members, &[], &[]);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "Iqbal");
        assert!(views[0].reports.is_empty());
    }

    #[test]
    fn test_member_order_preserved() {
        let members = vec![member("Kevin"), member("Dion"), member("Indri")];
        let views = build_member_views(&members, &[], &[]);
        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Kevin", "Dion", "Indri"]);
    }

    #[test]
    fn test_projects_grouped_per_month_in_row_order() {
        let m = member("Dion");
        let id = m.id_string();
        let projects = vec![
            project(&id, "2026-01", "Project Anaxa", "GREEN"),
            project(&id, "2026-01", "Marketing Plan", "YELLOW"),
            project(&id, "2026-02", "Social Media Blitz", "GREEN"),
        ];
        let views = build_member_views(&[m], &projects, &[]);
        let jan = &views[0].reports["2026-01"];
        assert_eq!(jan.projects.len(), 2);
        assert_eq!(jan.projects[0].name, "Project Anaxa");
        assert_eq!(jan.projects[0].status, ProjectStatus::OnTrack);
        assert_eq!(jan.projects[1].name, "Marketing Plan");
        assert_eq!(jan.projects[1].status, ProjectStatus::AtRisk);
        assert_eq!(views[0].reports["2026-02"].projects.len(), 1);
    }

    #[test]
    fn test_projects_only_month_has_no_kpi_or_history() {
        let m = member("Indri");
        let id = m.id_string();
        let projects = vec![project(&id, "2026-02", "Client Acquisition", "GREEN")];
        let views = build_member_views(&[m], &projects, &[]);
        let feb = &views[0].reports["2026-02"];
        assert!(feb.kpi.is_none());
        assert!(feb.kpi_history.is_none());
    }

    #[test]
    fn test_unknown_status_bucketed_not_rejected() {
        let m = member("Syahrun");
        let id = m.id_string();
        let projects = vec![project(&id, "2026-01", "Assets", "MAGENTA")];
        let views = build_member_views(&[m], &projects, &[]);
        let entry = &views[0].reports["2026-01"].projects[0];
        assert_eq!(entry.status, ProjectStatus::Unknown);
    }

    #[test]
    fn test_global_history_attached_to_every_kpi_month() {
        // The end-to-end scenario: two KPI months, one project month.
        let m = member("Kevin");
        let id = m.id_string();
        let projects = vec![project(&id, "2026-01", "Strategy Anaxa", "GREEN")];
        let kpis = vec![
            kpi(&id, "2026-01", "Revenue", 85.0, 75.0),
            kpi(&id, "2026-02", "Revenue", 92.0, 85.0),
        ];
        let views = build_member_views(&[m], &projects, &kpis);
        assert_eq!(views.len(), 1);

        let expected = vec![
            KpiHistoryPoint {
                month: "Jan".to_string(),
                value: 85.0,
            },
            KpiHistoryPoint {
                month: "Feb".to_string(),
                value: 92.0,
            },
        ];

        let jan = &views[0].reports["2026-01"];
        let feb = &views[0].reports["2026-02"];
        assert_eq!(jan.kpi_history.as_ref().unwrap(), &expected);
        // Same full series on the later month too, not a causally-scoped one
        assert_eq!(feb.kpi_history.as_ref().unwrap(), &expected);
        assert_eq!(jan.kpi.as_ref().unwrap().value, 85.0);
        assert_eq!(feb.kpi.as_ref().unwrap().value, 92.0);
        assert_eq!(jan.projects.len(), 1);
        assert!(feb.projects.is_empty());
    }

    #[test]
    fn test_kpi_rows_sorted_by_month_before_history() {
        let m = member("Dion");
        let id = m.id_string();
        // Rows arrive out of order; history must still be ascending
        let kpis = vec![
            kpi(&id, "2026-02", "Web Traffic", 6500.0, 5000.0),
            kpi(&id, "2025-12", "Web Traffic", 4200.0, 3000.0),
            kpi(&id, "2026-01", "Web Traffic", 5000.0, 4200.0),
        ];
        let views = build_member_views(&[m], &[], &kpis);
        let history = views[0].reports["2026-01"].kpi_history.as_ref().unwrap();
        let months: Vec<&str> = history.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["Dec", "Jan", "Feb"]);
    }

    #[test]
    fn test_duplicate_month_last_write_wins() {
        let m = member("Kevin");
        let id = m.id_string();
        let kpis = vec![
            kpi(&id, "2026-01", "Revenue", 80.0, 75.0),
            kpi(&id, "2026-01", "Revenue", 85.0, 75.0),
        ];
        let views = build_member_views(&[m], &[], &kpis);
        let jan = &views[0].reports["2026-01"];
        // The later row wins the kpi slot
        assert_eq!(jan.kpi.as_ref().unwrap().value, 85.0);
        // But both rows contribute history points
        let history = jan.kpi_history.as_ref().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, 80.0);
        assert_eq!(history[1].value, 85.0);
    }

    #[test]
    fn test_rows_for_other_members_ignored() {
        let a = member("Kevin");
        let b = member("Dion");
        let id_a = a.id_string();
        let projects = vec![project(&id_a, "2026-01", "Strategy Anaxa", "GREEN")];
        let kpis = vec![kpi(&id_a, "2026-01", "Revenue", 85.0, 75.0)];
        let views = build_member_views(&[a, b], &projects, &kpis);
        assert_eq!(views[0].reports.len(), 1);
        assert!(views[1].reports.is_empty());
    }

    #[test]
    fn test_report_keys_iterate_chronologically() {
        let m = member("Kevin");
        let id = m.id_string();
        let kpis = vec![
            kpi(&id, "2026-02", "Revenue", 92.0, 85.0),
            kpi(&id, "2025-11", "Revenue", 65.0, 0.0),
            kpi(&id, "2026-01", "Revenue", 85.0, 75.0),
        ];
        let views = build_member_views(&[m], &[], &kpis);
        let keys: Vec<&str> = views[0].reports.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["2025-11", "2026-01", "2026-02"]);
    }
}
