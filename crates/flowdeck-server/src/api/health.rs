//! Health check endpoint for the Flowdeck Server
//!
//! This module contains the health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::server::FlowdeckServer;

/// Health check handler
///
/// Probes the four engine cluster services and reports one boolean per
/// service. The HTTP status is 200 only when every service is healthy,
/// 503 otherwise.
pub async fn health_check(State(server): State<Arc<FlowdeckServer>>) -> impl IntoResponse {
    info!("Health check requested");

    let services = server.check_health().await;

    let status = if services.all_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": services.all_healthy(),
            "services": services,
        })),
    )
}
