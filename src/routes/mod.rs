//! Router assembly: common and entity routes behind the request log and body limit.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::logging::log_request;
use crate::state::AppState;
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// The full application router.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_request))
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
