//! Engine bridge API
//!
//! Handlers for deploying diagrams and querying the engine cluster. Engine
//! outcomes are returned with HTTP 200 and a `success` flag in the envelope;
//! the flag, not the transport status, reports whether the engine accepted
//! the request.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::errors::api_error_response;
use crate::server::FlowdeckServer;

/// Request for deploying raw BPMN XML
#[derive(Debug, Deserialize)]
pub struct DeployRawRequest {
    pub name: String,
    pub xml_content: String,
}

/// Request for creating a process instance
#[derive(Debug, Deserialize)]
pub struct CreateInstanceRequest {
    pub bpmn_process_id: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// Query parameters for listing process instances
#[derive(Debug, Deserialize)]
pub struct InstanceListQuery {
    pub bpmn_process_id: Option<String>,
}

/// Handler for deploying a stored diagram
pub async fn deploy_diagram_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match server.deploy_stored_diagram(id).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => api_error_response(&err),
    }
}

/// Handler for deploying raw BPMN XML without persisting a diagram
pub async fn deploy_raw_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Json(request): Json<DeployRawRequest>,
) -> impl IntoResponse {
    let result = server.deploy_raw(&request.name, &request.xml_content).await;
    Json(result)
}

/// Handler for creating a process instance
pub async fn create_instance_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Json(request): Json<CreateInstanceRequest>,
) -> impl IntoResponse {
    let result = server
        .create_instance(&request.bpmn_process_id, request.variables)
        .await;
    Json(result)
}

/// Handler for listing process instances
pub async fn list_instances_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Query(query): Query<InstanceListQuery>,
) -> impl IntoResponse {
    let result = server
        .list_instances(query.bpmn_process_id.as_deref())
        .await;
    Json(result)
}

/// Handler for listing deployed process definitions
pub async fn list_definitions_handler(
    State(server): State<Arc<FlowdeckServer>>,
) -> impl IntoResponse {
    let result = server.list_definitions().await;
    Json(result)
}
