//! Main Flowdeck Server implementation
//!
//! This module contains the FlowdeckServer implementation.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use serde_json::{Map, Value};
use uuid::Uuid;

use flowdeck_store::{BpmnDiagram, DiagramDraft, DiagramStore};

use crate::config::ServerConfig;
use crate::deployment::DeploymentManager;
use crate::engine::{DeploymentResult, InstanceResult, QueryResult};
use crate::error::ServerResult;
use crate::health::{HealthAggregator, HealthReport};

/// Main server implementation
#[derive(Debug, Clone)]
pub struct FlowdeckServer {
    /// Configuration
    pub config: ServerConfig,

    /// Diagram store
    diagrams: Arc<dyn DiagramStore>,

    /// Deployment orchestration
    deployments: DeploymentManager,

    /// Cluster health aggregation
    health: HealthAggregator,
}

impl FlowdeckServer {
    /// Create a new FlowdeckServer
    pub fn new(
        config: ServerConfig,
        diagrams: Arc<dyn DiagramStore>,
        deployments: DeploymentManager,
        health: HealthAggregator,
    ) -> Self {
        Self {
            config,
            diagrams,
            deployments,
            health,
        }
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        info!("Starting Flowdeck Server");

        // Build the API router
        let app = crate::api::build_router(Arc::new(self.clone()));

        // Create and bind the TCP listener
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        // Run the server
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Create a new diagram
    pub async fn create_diagram(&self, draft: DiagramDraft) -> ServerResult<BpmnDiagram> {
        Ok(self.diagrams.create(draft).await?)
    }

    /// Get a diagram by id
    pub async fn get_diagram(&self, id: Uuid) -> ServerResult<BpmnDiagram> {
        Ok(self.diagrams.get(id).await?)
    }

    /// List all live diagrams
    pub async fn list_diagrams(&self) -> ServerResult<Vec<BpmnDiagram>> {
        Ok(self.diagrams.list().await?)
    }

    /// Update a diagram
    pub async fn update_diagram(&self, id: Uuid, draft: DiagramDraft) -> ServerResult<BpmnDiagram> {
        Ok(self.diagrams.update(id, draft).await?)
    }

    /// Soft-delete a diagram
    pub async fn delete_diagram(&self, id: Uuid) -> ServerResult<()> {
        Ok(self.diagrams.soft_delete(id).await?)
    }

    /// Deploy a stored diagram to the engine
    pub async fn deploy_stored_diagram(&self, id: Uuid) -> ServerResult<DeploymentResult> {
        let diagram = self.diagrams.get(id).await?;
        Ok(self
            .deployments
            .deploy_diagram(&diagram.name, &diagram.xml_content)
            .await)
    }

    /// Deploy raw BPMN XML without touching diagram storage
    pub async fn deploy_raw(&self, name: &str, xml_content: &str) -> DeploymentResult {
        self.deployments.deploy_diagram(name, xml_content).await
    }

    /// Start a process instance
    pub async fn create_instance(
        &self,
        process_id: &str,
        variables: Map<String, Value>,
    ) -> InstanceResult {
        self.deployments.create_instance(process_id, variables).await
    }

    /// List process instances
    pub async fn list_instances(&self, process_id: Option<&str>) -> QueryResult {
        self.deployments.list_instances(process_id).await
    }

    /// List deployed process definitions
    pub async fn list_definitions(&self) -> QueryResult {
        self.deployments.list_definitions().await
    }

    /// Probe cluster health
    pub async fn check_health(&self) -> HealthReport {
        self.health.check().await
    }
}
