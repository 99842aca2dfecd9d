//! Configuration for Pulseboard
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

use crate::types::PulseError;

/// Pulseboard - team performance dashboard service
#[derive(Parser, Debug, Clone)]
#[command(name = "pulseboard")]
#[command(about = "Team performance dashboard service")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "pulseboard")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// API key for the text-generation service (insight summaries)
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Model name for the text-generation service
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-pro")]
    pub gemini_model: String,

    /// Timeout for insight generation requests in milliseconds
    #[arg(long, env = "INSIGHT_TIMEOUT_MS", default_value = "20000")]
    pub insight_timeout_ms: u64,

    /// Enable development mode (disables auth, MongoDB optional)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), PulseError> {
        if !self.dev_mode && self.jwt_secret.is_none() {
            return Err(PulseError::Config(
                "JWT_SECRET is required in production mode".into(),
            ));
        }

        if self.gemini_model.is_empty() {
            return Err(PulseError::Config("GEMINI_MODEL must not be empty".into()));
        }

        Ok(())
    }
}
