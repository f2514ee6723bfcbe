//! Diagram authoring API
//!
//! CRUD handlers for BPMN diagrams. Deletes are soft; exports serve the raw
//! XML as a file download.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use flowdeck_store::DiagramDraft;

use crate::api::errors::api_error_response;
use crate::deployment::DeploymentManager;
use crate::error::{ServerError, ServerResult};
use crate::server::FlowdeckServer;

/// Longest accepted diagram name.
const MAX_NAME_LENGTH: usize = 255;

fn validate_draft(draft: &DiagramDraft) -> ServerResult<()> {
    if draft.name.trim().is_empty() {
        return Err(ServerError::ValidationError(
            "Diagram name is required".to_string(),
        ));
    }
    if draft.name.len() > MAX_NAME_LENGTH {
        return Err(ServerError::ValidationError(format!(
            "Diagram name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if draft.xml_content.is_empty() {
        return Err(ServerError::ValidationError(
            "Diagram XML content is required".to_string(),
        ));
    }
    Ok(())
}

/// Handler for creating a diagram
pub async fn create_diagram_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Json(draft): Json<DiagramDraft>,
) -> impl IntoResponse {
    if let Err(err) = validate_draft(&draft) {
        return api_error_response(&err);
    }

    match server.create_diagram(draft).await {
        Ok(diagram) => {
            info!(%diagram.id, "Diagram created");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "BPMN diagram saved successfully",
                    "diagram": diagram,
                })),
            )
                .into_response()
        }
        Err(err) => api_error_response(&err),
    }
}

/// Handler for listing diagrams
pub async fn list_diagrams_handler(
    State(server): State<Arc<FlowdeckServer>>,
) -> impl IntoResponse {
    match server.list_diagrams().await {
        Ok(diagrams) => Json(json!({ "success": true, "diagrams": diagrams })).into_response(),
        Err(err) => api_error_response(&err),
    }
}

/// Handler for getting a diagram by id
pub async fn get_diagram_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match server.get_diagram(id).await {
        Ok(diagram) => Json(json!({ "success": true, "diagram": diagram })).into_response(),
        Err(err) => api_error_response(&err),
    }
}

/// Handler for updating a diagram
pub async fn update_diagram_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Path(id): Path<Uuid>,
    Json(draft): Json<DiagramDraft>,
) -> impl IntoResponse {
    if let Err(err) = validate_draft(&draft) {
        return api_error_response(&err);
    }

    match server.update_diagram(id, draft).await {
        Ok(diagram) => Json(json!({
            "success": true,
            "message": "BPMN diagram updated successfully",
            "diagram": diagram,
        }))
        .into_response(),
        Err(err) => api_error_response(&err),
    }
}

/// Handler for soft-deleting a diagram
pub async fn delete_diagram_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match server.delete_diagram(id).await {
        Ok(()) => {
            info!(%id, "Diagram deleted");
            Json(json!({
                "success": true,
                "message": "BPMN diagram deleted successfully",
            }))
            .into_response()
        }
        Err(err) => api_error_response(&err),
    }
}

/// Handler for exporting a diagram's XML as a file download
pub async fn export_diagram_handler(
    State(server): State<Arc<FlowdeckServer>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match server.get_diagram(id).await {
        Ok(diagram) => {
            let filename = DeploymentManager::resource_name(&diagram.name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/xml".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                diagram.xml_content,
            )
                .into_response()
        }
        Err(err) => api_error_response(&err),
    }
}
