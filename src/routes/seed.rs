//! Development seed endpoint
//!
//! POST /admin/seed - load the built-in demo dataset (five team members
//! with two months of projects and KPIs) into MongoDB. Gated to dev mode
//! or an admin token; rows are inserted as-is, so seeding twice duplicates
//! data.

use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::auth::PermissionLevel;
use crate::db::schemas::{
    KpiDoc, MemberDoc, ProjectDoc, KPI_COLLECTION, MEMBER_COLLECTION, PROJECT_COLLECTION,
};
use crate::routes::{error_response, json_response, require_auth, BoxBody};
use crate::server::AppState;
use crate::types::PulseError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub success: bool,
    pub members: usize,
    pub projects: usize,
    pub kpis: usize,
}

struct SeedMember {
    name: &'static str,
    role: &'static str,
    email: &'static str,
    kpi_label: &'static str,
    // (month, value, previous_value)
    kpis: &'static [(&'static str, f64, f64)],
    // (month, name, status, description)
    projects: &'static [(&'static str, &'static str, &'static str, &'static str)],
}

const SEED_MEMBERS: &[SeedMember] = &[
    SeedMember {
        name: "Kevin",
        role: "CEO",
        email: "kevin@keditech.example",
        kpi_label: "Revenue",
        kpis: &[("2026-01", 85.0, 75.0), ("2026-02", 92.0, 85.0)],
        projects: &[
            (
                "2026-01",
                "Strategy Anaxa",
                "GREEN",
                "Quarterly growth strategy rollout",
            ),
            (
                "2026-02",
                "Investor Deck",
                "YELLOW",
                "Series A materials behind schedule",
            ),
        ],
    },
    SeedMember {
        name: "Dion",
        role: "CMO",
        email: "dion@keditech.example",
        kpi_label: "Web Traffic",
        kpis: &[("2026-01", 5000.0, 4200.0), ("2026-02", 6500.0, 5000.0)],
        projects: &[
            (
                "2026-01",
                "Marketing Plan",
                "GREEN",
                "Channel mix for the new quarter",
            ),
            (
                "2026-02",
                "Social Media Blitz",
                "GREEN",
                "Coordinated launch campaign",
            ),
        ],
    },
    SeedMember {
        name: "Indri",
        role: "Business Development",
        email: "indri@keditech.example",
        kpi_label: "New Deals Closed",
        kpis: &[("2026-01", 4.0, 3.0), ("2026-02", 3.0, 4.0)],
        projects: &[
            (
                "2026-01",
                "Client Acquisition",
                "GREEN",
                "Outbound pipeline for enterprise leads",
            ),
            (
                "2026-02",
                "Partnership Deal",
                "RED",
                "Key partner renegotiating terms",
            ),
        ],
    },
    SeedMember {
        name: "Iqbal",
        role: "UI/UX Designer",
        email: "iqbal@keditech.example",
        kpi_label: "Screens Designed",
        kpis: &[("2026-01", 24.0, 18.0), ("2026-02", 31.0, 24.0)],
        projects: &[
            (
                "2026-01",
                "Mobile App Redesign",
                "YELLOW",
                "Navigation rework needs another review",
            ),
            (
                "2026-02",
                "Design System v2",
                "GREEN",
                "Component library migration",
            ),
        ],
    },
    SeedMember {
        name: "Syahrun",
        role: "Graphic Designer",
        email: "syahrun@keditech.example",
        kpi_label: "IG Followers",
        kpis: &[("2026-01", 12400.0, 11800.0), ("2026-02", 13100.0, 12400.0)],
        projects: &[
            (
                "2026-01",
                "Brand Assets",
                "GREEN",
                "Refresh of social templates",
            ),
            (
                "2026-02",
                "Campaign Visuals",
                "GREEN",
                "Creative for the launch campaign",
            ),
        ],
    },
];

async fn run_seed(state: &AppState) -> Result<SeedResponse, PulseError> {
    let mongo = state
        .mongo
        .as_ref()
        .ok_or_else(|| PulseError::Database("Database not available".into()))?;

    let members = mongo.collection::<MemberDoc>(MEMBER_COLLECTION).await?;
    let projects = mongo.collection::<ProjectDoc>(PROJECT_COLLECTION).await?;
    let kpis = mongo.collection::<KpiDoc>(KPI_COLLECTION).await?;

    let mut member_count = 0;
    let mut project_count = 0;
    let mut kpi_count = 0;

    for seed in SEED_MEMBERS {
        let doc = MemberDoc::new(
            seed.name.to_string(),
            seed.role.to_string(),
            format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                seed.name
            ),
            Some(seed.email.to_string()),
        );
        let member_id = members.insert_one(doc).await?.to_hex();
        member_count += 1;

        for (month, name, status, description) in seed.projects {
            projects
                .insert_one(ProjectDoc::new(
                    member_id.clone(),
                    month.to_string(),
                    name.to_string(),
                    status.to_string(),
                    description.to_string(),
                ))
                .await?;
            project_count += 1;
        }

        for (month, value, previous_value) in seed.kpis {
            kpis.insert_one(KpiDoc::new(
                member_id.clone(),
                month.to_string(),
                seed.kpi_label.to_string(),
                *value,
                *previous_value,
            ))
            .await?;
            kpi_count += 1;
        }
    }

    Ok(SeedResponse {
        success: true,
        members: member_count,
        projects: project_count,
        kpis: kpi_count,
    })
}

/// POST /admin/seed
pub async fn handle_seed(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    // Dev mode allows seeding without an admin token
    if !state.args.dev_mode {
        let claims = match require_auth(&req, &state) {
            Ok(c) => c,
            Err(resp) => return resp,
        };
        if claims.level < PermissionLevel::Admin {
            return error_response(
                StatusCode::FORBIDDEN,
                "Admin permission required",
                "FORBIDDEN",
            );
        }
    }

    match run_seed(&state).await {
        Ok(response) => {
            info!(
                "Seeded demo data: {} members, {} projects, {} KPIs",
                response.members, response.projects, response.kpis
            );
            json_response(StatusCode::OK, &response)
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Seed failed: {}", e),
            "SEED_ERROR",
        ),
    }
}
