//! Operational endpoints: liveness, database readiness, build version.

use crate::sql::Statement;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// Body shared by `/health` and `/ready`; `database` only appears on readiness.
#[derive(Serialize)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

impl Probe {
    fn alive() -> Self {
        Probe { status: "ok", database: None }
    }

    fn ready(db_ok: bool) -> (StatusCode, Self) {
        if db_ok {
            (StatusCode::OK, Probe { status: "ok", database: Some("ok") })
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Probe { status: "degraded", database: Some("unavailable") },
            )
        }
    }
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

const BUILD: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

async fn health() -> Json<Probe> {
    Json(Probe::alive())
}

async fn ready(State(state): State<AppState>) -> Response {
    let db_ok = match state.db().query(&Statement::read("SELECT 1")).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            false
        }
    };
    let (status, probe) = Probe::ready(db_ok);
    (status, Json(probe)).into_response()
}

async fn version() -> Json<BuildInfo> {
    Json(BUILD)
}

/// GET /health, GET /ready (database round trip), GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_omits_database_field() {
        let out = serde_json::to_value(Probe::alive()).unwrap();
        assert_eq!(out, serde_json::json!({ "status": "ok" }));
    }

    #[test]
    fn failed_readiness_is_degraded_503() {
        let (status, probe) = Probe::ready(false);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            serde_json::to_value(probe).unwrap(),
            serde_json::json!({ "status": "degraded", "database": "unavailable" })
        );
    }

    #[test]
    fn version_reports_package() {
        let out = serde_json::to_value(BUILD).unwrap();
        assert_eq!(out["name"], "agence-vehicule");
    }
}
