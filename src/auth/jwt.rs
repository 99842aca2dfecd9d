//! JWT token generation and validation
//!
//! HS256 bearer tokens carrying the account identifier (email) and
//! permission level. The identifier is how the update-submission flow
//! resolves the caller to their team member record.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::PulseError;

/// Secret used when running with --dev-mode and no JWT_SECRET
const DEV_SECRET: &str = "dev-only-insecure-secret";

/// Permission levels encoded in tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Signed-in team member: dashboard reads, update submission, insight
    #[default]
    Member,
    /// Administrative operations (seeding, account provisioning)
    Admin,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier (email)
    pub sub: String,
    /// Permission level
    #[serde(default)]
    pub level: PermissionLevel,
    /// Expiry (unix seconds)
    pub exp: u64,
    /// Issued at (unix seconds)
    pub iat: u64,
}

/// Input for token generation
#[derive(Debug, Clone)]
pub struct TokenInput {
    pub identifier: String,
    pub level: PermissionLevel,
}

/// Token generator and validator
#[derive(Clone)]
pub struct JwtValidator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_seconds: u64,
}

impl JwtValidator {
    /// Create a validator with the given secret
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self, PulseError> {
        if secret.is_empty() {
            return Err(PulseError::Auth("JWT secret must not be empty".into()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        })
    }

    /// Create a dev-mode validator with a fixed insecure secret
    pub fn new_dev() -> Self {
        Self {
            encoding: EncodingKey::from_secret(DEV_SECRET.as_bytes()),
            decoding: DecodingKey::from_secret(DEV_SECRET.as_bytes()),
            expiry_seconds: 3600,
        }
    }

    /// Generate a token; returns (token, expires_at unix seconds)
    pub fn generate_token(&self, input: TokenInput) -> Result<(String, u64), PulseError> {
        let now = unix_now();
        let claims = Claims {
            sub: input.identifier,
            level: input.level,
            exp: now + self.expiry_seconds,
            iat: now,
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| PulseError::Auth(format!("Failed to sign token: {}", e)))?;

        Ok((token, claims.exp))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, PulseError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| PulseError::Auth(format!("Invalid token: {}", e)))
    }
}

/// Extract a bearer token from an Authorization header value
pub fn extract_token_from_header(header: Option<&str>) -> Option<String> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
