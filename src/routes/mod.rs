//! HTTP routes for Pulseboard

pub mod auth_routes;
pub mod dashboard;
pub mod health;
pub mod insight;
pub mod reports;
pub mod seed;

pub use auth_routes::handle_auth_request;
pub use dashboard::handle_dashboard;
pub use health::{health_check, version_info};
pub use insight::handle_insight;
pub use reports::handle_submit_report;
pub use seed::handle_seed;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::{extract_token_from_header, Claims, JwtValidator};
use crate::server::AppState;
use crate::types::PulseError;

pub(crate) type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

pub(crate) fn error_response(status: StatusCode, message: &str, code: &str) -> Response<BoxBody> {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
            code: Some(code.to_string()),
        },
    )
}

pub(crate) fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub(crate) fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) async fn parse_json_body<T: for<'de> Deserialize<'de>>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, PulseError> {
    let body = req
        .collect()
        .await
        .map_err(|e| PulseError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > 10240 {
        return Err(PulseError::Http("Request body too large".into()));
    }

    serde_json::from_slice(&bytes).map_err(|e| PulseError::Http(format!("Invalid JSON: {}", e)))
}

pub(crate) fn get_auth_header(req: &Request<hyper::body::Incoming>) -> Option<&str> {
    req.headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Build the JWT validator from config, or an error response if auth is
/// misconfigured
pub(crate) fn get_jwt_validator(state: &AppState) -> Result<JwtValidator, Response<BoxBody>> {
    if state.args.dev_mode {
        Ok(JwtValidator::new_dev())
    } else {
        match &state.args.jwt_secret {
            Some(secret) => {
                JwtValidator::new(secret.clone(), state.args.jwt_expiry_seconds).map_err(|e| {
                    error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &format!("JWT configuration error: {}", e),
                        "CONFIG_ERROR",
                    )
                })
            }
            None => Err(error_response(
                StatusCode::NOT_IMPLEMENTED,
                "Authentication not enabled (missing JWT_SECRET)",
                "NOT_ENABLED",
            )),
        }
    }
}

/// Require a valid bearer token, returning its claims or a 401 response
///
/// In dev mode a missing header resolves to a built-in local identity so
/// the dashboard can be exercised without registering.
pub(crate) fn require_auth(
    req: &Request<hyper::body::Incoming>,
    state: &AppState,
) -> Result<Claims, Response<BoxBody>> {
    let jwt = get_jwt_validator(state)?;

    let token = match extract_token_from_header(get_auth_header(req)) {
        Some(t) => t,
        None if state.args.dev_mode => {
            return Ok(Claims {
                sub: "dev@localhost".to_string(),
                level: crate::auth::PermissionLevel::Admin,
                exp: u64::MAX,
                iat: 0,
            })
        }
        None => {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header",
                "UNAUTHORIZED",
            ))
        }
    };

    jwt.validate_token(&token).map_err(|_| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid or expired token",
            "UNAUTHORIZED",
        )
    })
}
