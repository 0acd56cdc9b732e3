//! Tracing setup and per-request logging.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::dispatcher;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins; otherwise `agence_vehicule=info`.
pub fn init_logging() {
    if dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agence_vehicule=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Log method, URL, status and latency of every request.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let url = req.uri().path_and_query().map(|pq| pq.as_str().to_string()).unwrap_or_default();
    let started = Instant::now();
    tracing::info!(%method, %url, "request received");
    let response = next.run(req).await;
    tracing::info!(
        %method,
        %url,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
