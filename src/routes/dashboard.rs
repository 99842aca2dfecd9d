//! Dashboard read endpoint
//!
//! GET /api/dashboard            - full per-member, per-month report tree
//! GET /api/dashboard?month=KEY  - card view for one month: projects ranked
//!                                 by severity, KPI with computed trend
//!
//! The three collections are fetched concurrently and joined in memory.
//! A fetch failure degrades to an empty member list with an error field
//! rather than a 5xx, so the dashboard page always renders.

use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::db::schemas::{
    KpiDoc, MemberDoc, ProjectDoc, KPI_COLLECTION, MEMBER_COLLECTION, PROJECT_COLLECTION,
};
use crate::report::aggregate::{build_member_views, KpiHistoryPoint, MemberView};
use crate::report::month::{is_valid_month_key, month_label};
use crate::report::ranker::rank_by_severity;
use crate::report::status::ProjectStatus;
use crate::report::trend::{compute_trend, Trend};
use crate::routes::{error_response, json_response, require_auth, BoxBody};
use crate::server::AppState;
use crate::types::PulseError;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub members: Vec<MemberView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One member's card for a single month
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCard {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    /// Projects for the month, most severe first
    pub projects: Vec<RankedProject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi: Option<KpiCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi_history: Option<Vec<KpiHistoryPoint>>,
}

#[derive(Debug, Serialize)]
pub struct RankedProject {
    pub name: String,
    pub status: ProjectStatus,
    /// Display label for the status ("On Track", "At Risk", ...)
    pub status_label: &'static str,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub label: String,
    pub value: f64,
    pub previous_value: f64,
    pub trend: Trend,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthViewResponse {
    pub month: String,
    pub month_label: String,
    pub members: Vec<MemberCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fetch the three row sets concurrently
pub(crate) async fn fetch_rows(
    state: &AppState,
) -> Result<(Vec<MemberDoc>, Vec<ProjectDoc>, Vec<KpiDoc>), PulseError> {
    let mongo = state
        .mongo
        .as_ref()
        .ok_or_else(|| PulseError::Database("Database not available".into()))?;

    let (members_col, projects_col, kpis_col) = tokio::join!(
        mongo.collection::<MemberDoc>(MEMBER_COLLECTION),
        mongo.collection::<ProjectDoc>(PROJECT_COLLECTION),
        mongo.collection::<KpiDoc>(KPI_COLLECTION),
    );

    let (members_col, projects_col, kpis_col) = (members_col?, projects_col?, kpis_col?);

    let (members, projects, kpis) = tokio::join!(
        members_col.find_all(),
        projects_col.find_all(),
        kpis_col.find_all(),
    );

    Ok((members?, projects?, kpis?))
}

/// Shape a fetch result into the response member list
///
/// A failure on any of the three sources yields an empty member list with
/// an error message, never a partial join.
fn shape_views(
    rows: Result<(Vec<MemberDoc>, Vec<ProjectDoc>, Vec<KpiDoc>), PulseError>,
) -> (Vec<MemberView>, Option<String>) {
    match rows {
        Ok((members, projects, kpis)) => (build_member_views(&members, &projects, &kpis), None),
        Err(e) => {
            error!("Dashboard fetch failed: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    }
}

fn month_query(req: &Request<hyper::body::Incoming>) -> Option<String> {
    req.uri().query().and_then(|q| {
        q.split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "month")
            .map(|(_, v)| v.to_string())
    })
}

/// GET /api/dashboard
pub async fn handle_dashboard(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = require_auth(&req, &state) {
        return resp;
    }

    let month = month_query(&req);

    if let Some(ref key) = month {
        if !is_valid_month_key(key) {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid month key: {} (expected YYYY-MM)", key),
                "INVALID_MONTH",
            );
        }
    }

    let (views, fetch_error) = shape_views(fetch_rows(&state).await);

    match month {
        Some(key) => json_response(
            StatusCode::OK,
            &MonthViewResponse {
                month_label: month_label(&key),
                members: views.iter().map(|v| build_card(v, &key)).collect(),
                month: key,
                error: fetch_error,
            },
        ),
        None => json_response(
            StatusCode::OK,
            &DashboardResponse {
                members: views,
                error: fetch_error,
            },
        ),
    }
}

/// Project a member's full view down to one month's card
fn build_card(view: &MemberView, month_key: &str) -> MemberCard {
    let report = view.reports.get(month_key);

    let projects = report
        .map(|r| rank_by_severity(&r.projects))
        .unwrap_or_default()
        .into_iter()
        .map(|p| RankedProject {
            status_label: p.status.label(),
            name: p.name,
            status: p.status,
            description: p.description,
        })
        .collect();

    let kpi = report.and_then(|r| r.kpi.as_ref()).map(|k| KpiCard {
        label: k.label.clone(),
        value: k.value,
        previous_value: k.previous_value,
        trend: compute_trend(k.value, k.previous_value),
    });

    MemberCard {
        id: view.id.clone(),
        name: view.name.clone(),
        role: view.role.clone(),
        avatar: view.avatar.clone(),
        projects,
        kpi,
        kpi_history: report.and_then(|r| r.kpi_history.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::aggregate::{KpiMetric, MonthlyReport, ProjectEntry};
    use crate::report::trend::TrendDirection;
    use std::collections::BTreeMap;

    fn view_with(reports: BTreeMap<String, MonthlyReport>) -> MemberView {
        MemberView {
            id: "abc".to_string(),
            name: "Kevin".to_string(),
            role: "CEO".to_string(),
            avatar: "https://avatars.example/kevin".to_string(),
            reports,
        }
    }

    #[test]
    fn test_fetch_failure_yields_empty_members_with_error() {
        let (views, error) = shape_views(Err(PulseError::Database("connection reset".into())));
        assert!(views.is_empty());
        assert_eq!(error.unwrap(), "Database error: connection reset");
    }

    #[test]
    fn test_fetch_success_yields_views_without_error() {
        let member = crate::db::schemas::MemberDoc::new(
            "Kevin".to_string(),
            "CEO".to_string(),
            String::new(),
            None,
        );
        let (views, error) = shape_views(Ok((vec![member], vec![], vec![])));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "Kevin");
        assert!(error.is_none());
    }

    #[test]
    fn test_card_for_missing_month_is_empty() {
        let view = view_with(BTreeMap::new());
        let card = build_card(&view, "2026-01");
        assert!(card.projects.is_empty());
        assert!(card.kpi.is_none());
        assert!(card.kpi_history.is_none());
        assert_eq!(card.name, "Kevin");
    }

    #[test]
    fn test_card_ranks_projects_and_computes_trend() {
        let mut reports = BTreeMap::new();
        reports.insert(
            "2026-02".to_string(),
            MonthlyReport {
                projects: vec![
                    ProjectEntry {
                        name: "Steady".to_string(),
                        status: ProjectStatus::OnTrack,
                        description: "...".to_string(),
                    },
                    ProjectEntry {
                        name: "Burning".to_string(),
                        status: ProjectStatus::Critical,
                        description: "...".to_string(),
                    },
                ],
                kpi: Some(KpiMetric {
                    label: "Revenue".to_string(),
                    value: 92.0,
                    previous_value: 85.0,
                }),
                kpi_history: None,
            },
        );
        let card = build_card(&view_with(reports), "2026-02");

        assert_eq!(card.projects[0].name, "Burning");
        assert_eq!(card.projects[0].status_label, "Critical");
        assert_eq!(card.projects[1].name, "Steady");

        let kpi = card.kpi.unwrap();
        assert_eq!(kpi.trend.direction, TrendDirection::Up);
        assert_eq!(kpi.trend.delta, 7.0);
    }
}
