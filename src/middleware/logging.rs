//! Logging middleware
//!
//! Provides logger setup and per-request logging.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Setup logging for the server, defaulting to `info` unless `RUST_LOG` is set
pub fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Log every request with its outcome and latency
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_success() {
        info!("{} {} -> {} ({:?})", method, uri, status.as_u16(), started.elapsed());
    } else {
        warn!("{} {} -> {} ({:?})", method, uri, status.as_u16(), started.elapsed());
    }

    response
}
