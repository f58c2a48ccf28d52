//! Health check endpoints
//!
//! - /health, /healthz - Liveness probe; also reports the store backend and record count
//! - /version - Build information
//!
//! /health answers 503 when the store cannot be queried, so a lost MongoDB
//! connection shows up in probes instead of only in request logs.

use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::warn;

use super::response::{json_response, FullBody};
use crate::server::AppState;

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    /// Store backend ("mongodb" or "memory")
    pub store: &'static str,
    /// Number of stored blogs, absent when the store is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blogs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
}

/// Liveness probe
pub async fn health_check(state: &AppState) -> Response<FullBody> {
    let (blogs, error) = match state.blogs.count().await {
        Ok(count) => (Some(count), None),
        Err(e) => {
            warn!("Health check could not reach store: {}", e);
            (None, Some(e.to_string()))
        }
    };

    let healthy = error.is_none();
    let body = HealthResponse {
        healthy,
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        store: state.blogs.backend(),
        blogs,
        error,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json_response(status, &body)
}

pub fn version_info() -> Response<FullBody> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            commit: env!("GIT_COMMIT_SHORT"),
        },
    )
}
