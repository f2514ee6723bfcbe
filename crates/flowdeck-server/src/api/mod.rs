//! API module for the Flowdeck Server
//!
//! This module contains the API routes and handlers for the Flowdeck Server.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod diagrams;
pub mod engine;
pub mod errors;
pub mod health;

use crate::server::FlowdeckServer;

/// Build the router for API endpoints
pub fn build_router(server: Arc<FlowdeckServer>) -> Router {
    Router::new()
        // Diagram authoring
        .route(
            "/v1/diagrams",
            post(diagrams::create_diagram_handler).get(diagrams::list_diagrams_handler),
        )
        .route(
            "/v1/diagrams/:id",
            get(diagrams::get_diagram_handler)
                .put(diagrams::update_diagram_handler)
                .delete(diagrams::delete_diagram_handler),
        )
        .route("/v1/diagrams/:id/export", get(diagrams::export_diagram_handler))
        .route("/v1/diagrams/:id/deploy", post(engine::deploy_diagram_handler))
        // Engine bridge
        .route("/v1/deployments", post(engine::deploy_raw_handler))
        .route(
            "/v1/process-instances",
            post(engine::create_instance_handler).get(engine::list_instances_handler),
        )
        .route("/v1/process-definitions", get(engine::list_definitions_handler))
        // Health check
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        // Shared state
        .with_state(server)
}
