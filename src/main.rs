//! Pulseboard - team performance dashboard service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pulseboard::config::Args;
use pulseboard::db::MongoClient;
use pulseboard::server::{self, AppState};
use pulseboard::services::InsightClient;
use pulseboard::types::PulseError;

#[tokio::main]
async fn main() -> Result<(), PulseError> {
    // Load .env if present (dev convenience; real deployments use env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("pulseboard={},info", args.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Pulseboard {} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown")
    );

    if let Err(e) = args.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e);
    }

    if args.dev_mode {
        warn!("Running in dev mode: auth uses an insecure built-in secret");
    }

    // MongoDB is required in production; in dev mode the service degrades
    // to empty reads and token-only auth without it
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => Some(client),
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB unavailable ({}); continuing without it", e);
                None
            } else {
                error!("MongoDB connection failed: {}", e);
                return Err(e);
            }
        }
    };

    let insight = InsightClient::new(
        args.gemini_api_key.clone(),
        args.gemini_model.clone(),
        args.insight_timeout_ms,
    )?;

    if !insight.has_api_key() {
        warn!("GEMINI_API_KEY not set; insight requests will return a configuration error");
    }

    let state = Arc::new(AppState::new(args, mongo, insight));

    server::run(state).await
}
