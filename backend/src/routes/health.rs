//! Probes and the metrics scrape
//!
//! - /health: process is up
//! - /health/ready: database reachable (Redis is reported but optional)
//! - /health/live: liveness
//! - /metrics: Prometheus text format

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<ProbeChecks>,
}

#[derive(Serialize)]
pub struct ProbeChecks {
    pub database: CheckStatus,
    pub cache: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy",
            message: None,
        }
    }

    fn unhealthy(message: String) -> Self {
        Self {
            status: "unhealthy",
            message: Some(message),
        }
    }
}

fn probe(status: &'static str) -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
    })
}

pub async fn health_check() -> Json<ProbeResponse> {
    probe("healthy")
}

pub async fn liveness_check() -> Json<ProbeResponse> {
    probe("alive")
}

/// 503 when the database is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ProbeResponse>, (StatusCode, Json<ProbeResponse>)> {
    let database = match db::health_check(state.db()).await {
        Ok(()) => CheckStatus::healthy(),
        Err(e) => CheckStatus::unhealthy(e.to_string()),
    };

    let cache = match state.redis() {
        None => CheckStatus {
            status: "disabled",
            message: None,
        },
        Some(mut conn) => match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(_) => CheckStatus::healthy(),
            Err(e) => CheckStatus::unhealthy(e.to_string()),
        },
    };

    let ready = database.status == "healthy";
    let response = Json(ProbeResponse {
        status: if ready { "ready" } else { "not_ready" },
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(ProbeChecks { database, cache }),
    });

    if ready {
        Ok(response)
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, response))
    }
}

/// 404 when no recorder is installed
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.as_ref() {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
