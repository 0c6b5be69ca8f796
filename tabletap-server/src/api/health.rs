//! Liveness endpoint, public and envelope-free so load balancers and
//! container probes can consume it directly

use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::SystemTime;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_seconds: u64,
}

static START_TIME: OnceLock<SystemTime> = OnceLock::new();

/// Record the process start; called once from `main` so uptime does not
/// begin at the first probe
pub fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: uptime_seconds(),
    })
}
