//! AI insight endpoint
//!
//! POST /api/insight {"month": "YYYY-MM"} - flatten the month's team data
//! into per-member summaries and ask the AI client for a short executive
//! summary. Upstream failures return 500 with the fixed fallback text in
//! the body so clients always have something to display.

use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::report::aggregate::MemberView;
use crate::report::month::is_valid_month_key;
use crate::routes::dashboard::fetch_rows;
use crate::routes::{
    error_response, json_response, parse_json_body, require_auth, BoxBody, ErrorResponse,
};
use crate::server::AppState;
use crate::services::{MemberSummary, FALLBACK_INSIGHT, MISSING_KEY_INSIGHT};

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    /// Month key, "YYYY-MM"
    pub month: String,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub summary: String,
}

/// Flatten one month of member views into prompt-ready summaries
fn summarize_month(views: &[MemberView], month_key: &str) -> Vec<MemberSummary> {
    views
        .iter()
        .map(|view| {
            let report = view.reports.get(month_key);

            MemberSummary {
                name: view.name.clone(),
                role: view.role.clone(),
                kpi: report.and_then(|r| r.kpi.clone()),
                active_project_count: report.map(|r| r.projects.len()).unwrap_or(0),
            }
        })
        .collect()
}

/// POST /api/insight
pub async fn handle_insight(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if let Err(resp) = require_auth(&req, &state) {
        return resp;
    }

    let body: InsightRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse {
                    error: format!("Invalid JSON body: {}", e),
                    code: None,
                },
            )
        }
    };

    if !is_valid_month_key(&body.month) {
        return error_response(
            StatusCode::BAD_REQUEST,
            &format!("Invalid month key: {} (expected YYYY-MM)", body.month),
            "INVALID_MONTH",
        );
    }

    let views = match fetch_rows(&state).await {
        Ok((members, projects, kpis)) => {
            crate::report::aggregate::build_member_views(&members, &projects, &kpis)
        }
        Err(e) => {
            error!("Insight data fetch failed: {}", e);
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &format!("Failed to load team data: {}", e),
                "DB_ERROR",
            );
        }
    };

    let summaries = summarize_month(&views, &body.month);
    let summary = state.insight.generate_summary(&body.month, &summaries).await;

    // Fallback text means the upstream call failed; surface that as a 500
    // with the fallback in the body so clients can still render it
    let status = if summary == FALLBACK_INSIGHT || summary == MISSING_KEY_INSIGHT {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    json_response(status, &InsightResponse { summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::aggregate::{KpiMetric, MonthlyReport, ProjectEntry};
    use crate::report::status::ProjectStatus;
    use std::collections::BTreeMap;

    #[test]
    fn test_summarize_month_counts_projects() {
        let mut reports = BTreeMap::new();
        reports.insert(
            "2026-01".to_string(),
            MonthlyReport {
                projects: vec![
                    ProjectEntry {
                        name: "Fine".to_string(),
                        status: ProjectStatus::OnTrack,
                        description: "...".to_string(),
                    },
                    ProjectEntry {
                        name: "Slipping".to_string(),
                        status: ProjectStatus::AtRisk,
                        description: "...".to_string(),
                    },
                ],
                kpi: Some(KpiMetric {
                    label: "Revenue".to_string(),
                    value: 85.0,
                    previous_value: 75.0,
                }),
                kpi_history: None,
            },
        );
        let views = vec![MemberView {
            id: "abc".to_string(),
            name: "Kevin".to_string(),
            role: "CEO".to_string(),
            avatar: String::new(),
            reports,
        }];

        let summaries = summarize_month(&views, "2026-01");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].active_project_count, 2);
        assert_eq!(summaries[0].kpi.as_ref().unwrap().value, 85.0);
    }

    #[test]
    fn test_summarize_month_handles_missing_month() {
        let views = vec![MemberView {
            id: "abc".to_string(),
            name: "Dion".to_string(),
            role: "CMO".to_string(),
            avatar: String::new(),
            reports: BTreeMap::new(),
        }];

        let summaries = summarize_month(&views, "2026-01");
        assert_eq!(summaries[0].active_project_count, 0);
        assert!(summaries[0].kpi.is_none());
    }
}
