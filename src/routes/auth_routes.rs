//! HTTP routes for authentication
//!
//! - POST /auth/register - Create an account and get a JWT token
//! - POST /auth/login    - Authenticate and get a JWT token
//! - POST /auth/logout   - Invalidate token (client-side mainly)
//! - GET  /auth/me       - Get current account info from token

use bson::doc;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, JwtValidator, PermissionLevel, TokenInput};
use crate::db::schemas::{AccountDoc, MemberDoc, ACCOUNT_COLLECTION, MEMBER_COLLECTION};
use crate::routes::{
    cors_preflight, error_response, json_response, parse_json_body, require_auth, BoxBody,
    ErrorResponse, SuccessResponse,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub identifier: String,
    pub expires_at: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub identifier: String,
    pub permission_level: String,
    /// Linked team member profile, when one exists for this identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// POST /auth/register
///
/// Flow:
/// 1. Validate identifier and password
/// 2. Check the identifier is not already taken
/// 3. Hash the password with argon2
/// 4. Store the account and return a JWT token
async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: RegisterRequest = match parse_json_body(req).await {
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

    if body.identifier.is_empty() || body.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: identifier, password",
            "MISSING_FIELDS",
        );
    }

    if body.password.len() < 8 {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
            "WEAK_PASSWORD",
        );
    }

    let jwt = match crate::routes::get_jwt_validator(&state) {
        Ok(j) => j,
        Err(resp) => return resp,
    };

    // Dev mode without MongoDB: issue a token without persisting
    if state.args.dev_mode && state.mongo.is_none() {
        info!("Dev mode register (no MongoDB): {}", body.identifier);
        return generate_auth_response(&jwt, &body.identifier, StatusCode::CREATED);
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

    let collection = match mongo.collection::<AccountDoc>(ACCOUNT_COLLECTION).await {
        Ok(c) => c,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                "DB_ERROR",
            )
        }
    };

    match collection
        .find_one(doc! { "identifier": &body.identifier })
        .await
    {
        Ok(Some(_)) => {
            return error_response(
                StatusCode::CONFLICT,
                "An account with this identifier already exists",
                "ACCOUNT_EXISTS",
            )
        }
        Ok(None) => {}
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                "DB_ERROR",
            )
        }
    }

    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to hash password: {}", e),
                "HASH_ERROR",
            )
        }
    };

    let account = AccountDoc::new(body.identifier.clone(), password_hash);
    if let Err(e) = collection.insert_one(account).await {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to create account: {}", e),
            "DB_ERROR",
        );
    }

    info!("Registered account: {}", body.identifier);
    generate_auth_response(&jwt, &body.identifier, StatusCode::CREATED)
}

/// POST /auth/login
async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let body: LoginRequest = match parse_json_body(req).await {
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

    if body.identifier.is_empty() || body.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: identifier, password",
            "MISSING_FIELDS",
        );
    }

    let jwt = match crate::routes::get_jwt_validator(&state) {
        Ok(j) => j,
        Err(resp) => return resp,
    };

    // Dev mode without MongoDB: accept any credentials
    if state.args.dev_mode && state.mongo.is_none() {
        warn!("Dev mode login (no MongoDB): {}", body.identifier);
        return generate_auth_response(&jwt, &body.identifier, StatusCode::OK);
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

    let collection = match mongo.collection::<AccountDoc>(ACCOUNT_COLLECTION).await {
        Ok(c) => c,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                "DB_ERROR",
            )
        }
    };

    let account = match collection
        .find_one(doc! { "identifier": &body.identifier })
        .await
    {
        Ok(Some(a)) => a,
        Ok(None) => {
            // Same error as wrong password, no account enumeration
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid identifier or password",
                "INVALID_CREDENTIALS",
            );
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Database error: {}", e),
                "DB_ERROR",
            )
        }
    };

    if !account.is_active {
        return error_response(StatusCode::FORBIDDEN, "Account is disabled", "DISABLED");
    }

    match verify_password(&body.password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid identifier or password",
                "INVALID_CREDENTIALS",
            )
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Password verification error: {}", e),
                "HASH_ERROR",
            )
        }
    }

    info!("Login: {}", body.identifier);
    generate_auth_response(&jwt, &body.identifier, StatusCode::OK)
}

/// POST /auth/logout
///
/// Tokens are stateless; logout is a client-side discard. The endpoint
/// exists so clients have a uniform place to end a session.
async fn handle_logout(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    // Token must at least be valid to log out
    if let Err(resp) = require_auth(&req, &state) {
        return resp;
    }

    json_response(
        StatusCode::OK,
        &SuccessResponse {
            success: true,
            message: "Logged out".to_string(),
        },
    )
}

/// GET /auth/me
async fn handle_me(req: Request<hyper::body::Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let claims = match require_auth(&req, &state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    // Attach the linked team member profile when one exists
    let member = match &state.mongo {
        Some(mongo) => match mongo.collection::<MemberDoc>(MEMBER_COLLECTION).await {
            Ok(collection) => collection
                .find_one(doc! { "email": &claims.sub })
                .await
                .ok()
                .flatten()
                .map(|m| MemberInfo {
                    id: m.id_string(),
                    name: m.name,
                    role: m.role,
                }),
            Err(_) => None,
        },
        None => None,
    };

    json_response(
        StatusCode::OK,
        &MeResponse {
            identifier: claims.sub,
            permission_level: format!("{:?}", claims.level).to_lowercase(),
            member,
        },
    )
}

fn generate_auth_response(
    jwt: &JwtValidator,
    identifier: &str,
    status: StatusCode,
) -> Response<BoxBody> {
    let input = TokenInput {
        identifier: identifier.to_string(),
        level: PermissionLevel::Member,
    };

    match jwt.generate_token(input) {
        Ok((token, expires_at)) => json_response(
            status,
            &AuthResponse {
                token,
                identifier: identifier.to_string(),
                expires_at,
            },
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to generate token: {}", e),
            "TOKEN_ERROR",
        ),
    }
}

/// Main auth route dispatcher
///
/// Returns None if the path is not an auth route.
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/auth") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    // Remove query string for matching
    let path = path.split('?').next().unwrap_or(path).to_string();

    let response = match (method, path.as_str()) {
        (&Method::POST, "/auth/register") => handle_register(req, state).await,
        (&Method::POST, "/auth/login") => handle_login(req, state).await,
        (&Method::POST, "/auth/logout") => handle_logout(req, state).await,
        (&Method::GET, "/auth/me") => handle_me(req, state).await,
        _ => error_response(StatusCode::NOT_FOUND, "Not found", "NOT_FOUND"),
    };

    Some(response)
}
