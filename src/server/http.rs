//! HTTP server and request routing
//!
//! Plain hyper http1 with manual routing. Each connection gets its own
//! task; state is shared behind an Arc.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::Args;
use crate::db::MongoClient;
use crate::routes::{self, cors_preflight, error_response, BoxBody};
use crate::services::InsightClient;
use crate::types::PulseError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// None when MongoDB is unreachable (allowed in dev mode)
    pub mongo: Option<MongoClient>,
    pub insight: InsightClient,
    pub started_at: SystemTime,
}

impl AppState {
    pub fn new(args: Args, mongo: Option<MongoClient>, insight: InsightClient) -> Self {
        Self {
            args,
            mongo,
            insight,
            started_at: SystemTime::now(),
        }
    }
}

/// Run the HTTP server until the process is stopped
pub async fn run(state: Arc<AppState>) -> Result<(), PulseError> {
    let addr = state.args.listen;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    loop {
        let (stream, remote) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(handle_request(req, state).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Connection error from {}: {}", remote, e);
            }
        });
    }
}

/// Route a request to its handler
async fn handle_request(req: Request<Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!("{} {}", method, path);

    // CORS preflight for any route
    if method == Method::OPTIONS {
        return cors_preflight();
    }

    // Auth routes (/auth/*) consume the request in their own dispatcher
    if path.starts_with("/auth") {
        if let Some(response) = routes::handle_auth_request(req, Arc::clone(&state)).await {
            return response;
        }
        return error_response(StatusCode::NOT_FOUND, "Not found", "NOT_FOUND");
    }

    match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        // Build info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // Dashboard reads (full tree, or one month via ?month=)
        (Method::GET, "/api/dashboard") => routes::handle_dashboard(req, state).await,

        // Monthly update submission
        (Method::POST, "/api/reports") => routes::handle_submit_report(req, state).await,

        // AI executive summary for one month
        (Method::POST, "/api/insight") => routes::handle_insight(req, state).await,

        // Demo dataset loader (dev mode or admin token)
        (Method::POST, "/admin/seed") => routes::handle_seed(req, state).await,

        (method, path) => {
            debug!("No route for {} {}", method, path);
            error_response(StatusCode::NOT_FOUND, "Not found", "NOT_FOUND")
        }
    }
}
