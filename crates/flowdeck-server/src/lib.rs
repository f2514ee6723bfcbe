//!
//! Flowdeck Server - BPMN authoring and deployment bridge
//!
//! This module exports all the components of the Flowdeck Server.

// External dependencies
use std::sync::Arc;
use std::time::Duration;

/// API module
pub mod api;

/// Deployment cache module
pub mod cache;

/// Configuration module
pub mod config;

/// Deployment orchestration module
pub mod deployment;

/// Engine client module
pub mod engine;

/// Error module
pub mod error;

/// Health aggregation module
pub mod health;

/// Server module
pub mod server;

/// XML normalization module
pub mod xml;

// Re-export key types
pub use cache::DeploymentCache;
pub use config::ServerConfig;
pub use deployment::DeploymentManager;
pub use error::{ServerError, ServerResult};
pub use health::{HealthAggregator, HealthReport};
pub use server::FlowdeckServer;

/// Run function
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    // Initialize logging
    init_logging(&config);

    // Create dependencies
    let diagrams = create_diagram_store();
    let deployment_store = create_deployment_store(&config);
    let engine = create_engine_client(&config);

    let cache = DeploymentCache::new(deployment_store);
    let deployments = DeploymentManager::new(engine, cache);
    let health = HealthAggregator::new(
        config.zeebe_actuator_url.clone(),
        config.operate_url.clone(),
        config.tasklist_url.clone(),
        config.elasticsearch_url.clone(),
    );

    // Create server
    let server = FlowdeckServer::new(config, diagrams, deployments, health);

    // Run server
    server.run().await
}

/// Initialize logging
fn init_logging(config: &ServerConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    // Create filter based on config
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Initialize subscriber
    fmt().with_env_filter(filter).with_target(true).init();
}

/// Create the diagram store
fn create_diagram_store() -> Arc<dyn flowdeck_store::DiagramStore> {
    tracing::info!("Using in-memory diagram store");
    Arc::new(flowdeck_store::memory::InMemoryDiagramStore::new())
}

/// Create the deployment metadata store
fn create_deployment_store(config: &ServerConfig) -> Arc<dyn flowdeck_store::DeploymentStore> {
    let ttl = Duration::from_secs(config.deployment_cache_ttl_days * 24 * 60 * 60);
    tracing::info!(
        ttl_days = config.deployment_cache_ttl_days,
        "Using in-memory deployment store"
    );
    Arc::new(flowdeck_store::memory::InMemoryDeploymentStore::with_ttl(
        ttl,
    ))
}

/// Create the engine client
fn create_engine_client(config: &ServerConfig) -> Arc<dyn engine::WorkflowEngine> {
    tracing::info!(
        gateway = %config.zeebe_rest_url,
        monitoring = %config.operate_url,
        "Using Zeebe-compatible engine client"
    );
    Arc::new(engine::zeebe::ZeebeEngineClient::new(
        config.zeebe_rest_url.clone(),
        config.operate_url.clone(),
    ))
}
