//! Health/status endpoint served at `/`

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use super::json_response;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// "development" or "production"
    pub mode: &'static str,
    pub uptime_secs: u64,
    pub timestamp: String,
    /// Store backend in use (mongodb or memory)
    pub store: &'static str,
}

fn build_health_response(state: &AppState) -> HealthResponse {
    HealthResponse {
        status: "ok",
        service: "question-hub",
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        store: state.store.backend(),
    }
}

/// Liveness/status payload
pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &build_health_response(&state))
}
