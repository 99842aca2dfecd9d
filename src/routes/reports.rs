//! Monthly update submission
//!
//! POST /api/reports - submit a project status and/or KPI reading for one
//! month, on behalf of the authenticated caller. The caller is resolved to
//! their team member record by the email in the token; callers without a
//! member profile get a 404 and nothing is written.

use bson::doc;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::schemas::{
    KpiDoc, MemberDoc, ProjectDoc, KPI_COLLECTION, MEMBER_COLLECTION, PROJECT_COLLECTION,
};
use crate::report::month::is_valid_month_key;
use crate::routes::{
    error_response, json_response, parse_json_body, require_auth, BoxBody, ErrorResponse,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    /// Month key, "YYYY-MM"
    pub month: String,
    #[serde(default)]
    pub project: Option<ProjectInput>,
    #[serde(default)]
    pub kpi: Option<KpiInput>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    /// Raw status value ("GREEN", "YELLOW", "RED"); stored as-is
    pub status: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiInput {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub previous_value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponse {
    pub success: bool,
    pub member_id: String,
    pub month: String,
    pub project_saved: bool,
    pub kpi_saved: bool,
}

/// POST /api/reports
pub async fn handle_submit_report(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let claims = match require_auth(&req, &state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let body: SubmitReportRequest = match parse_json_body(req).await {
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

    if body.project.is_none() && body.kpi.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Nothing to save: provide project and/or kpi",
            "EMPTY_UPDATE",
        );
    }

    if let Some(ref project) = body.project {
        if project.name.is_empty() {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Project name must not be empty",
                "INVALID_PROJECT",
            );
        }
    }

    if let Some(ref kpi) = body.kpi {
        if kpi.label.is_empty() {
            return error_response(
                StatusCode::BAD_REQUEST,
                "KPI label must not be empty",
                "INVALID_KPI",
            );
        }
        if !kpi.value.is_finite() || !kpi.previous_value.is_finite() {
            return error_response(
                StatusCode::BAD_REQUEST,
                "KPI values must be finite numbers",
                "INVALID_KPI",
            );
        }
    }

    let mongo = match &state.mongo {
        Some(m) => m,
        None => {
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not available",
                "DB_UNAVAILABLE",
            )
        }
    };

    // Resolve the caller to their team member record
    let members = match mongo.collection::<MemberDoc>(MEMBER_COLLECTION).await {
        Ok(c) => c,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                "DB_ERROR",
            )
        }
    };

    let member = match members.find_one(doc! { "email": &claims.sub }).await {
        Ok(Some(m)) => m,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                "No team member profile linked to this account",
                "PROFILE_NOT_FOUND",
            )
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                "DB_ERROR",
            )
        }
    };

    let member_id = member.id_string();
    let mut project_saved = false;
    let mut kpi_saved = false;

    if let Some(project) = body.project {
        let collection = match mongo.collection::<ProjectDoc>(PROJECT_COLLECTION).await {
            Ok(c) => c,
            Err(e) => {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("Database error: {}", e),
                    "DB_ERROR",
                )
            }
        };

        let row = ProjectDoc::new(
            member_id.clone(),
            body.month.clone(),
            project.name,
            project.status,
            project.description,
        );

        if let Err(e) = collection.insert_one(row).await {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to save project: {}", e),
                "DB_ERROR",
            );
        }
        project_saved = true;
    }

    if let Some(kpi) = body.kpi {
        let collection = match mongo.collection::<KpiDoc>(KPI_COLLECTION).await {
            Ok(c) => c,
            Err(e) => {
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("Database error: {}", e),
                    "DB_ERROR",
                )
            }
        };

        let row = KpiDoc::new(
            member_id.clone(),
            body.month.clone(),
            kpi.label,
            kpi.value,
            kpi.previous_value,
        );

        if let Err(e) = collection.insert_one(row).await {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to save KPI: {}", e),
                "DB_ERROR",
            );
        }
        kpi_saved = true;
    }

    info!(
        "Report saved for {} ({}): project={} kpi={}",
        member.name, body.month, project_saved, kpi_saved
    );

    json_response(
        StatusCode::CREATED,
        &SubmitReportResponse {
            success: true,
            member_id,
            month: body.month,
            project_saved,
            kpi_saved,
        },
    )
}
