//! Deployment orchestration
//!
//! This module is responsible for bridging locally stored diagrams and the
//! workflow engine: it normalizes BPMN XML, drives the engine client, keeps
//! the deployment cache current, and serves definition listings with a
//! cache fallback when the monitoring service is down.

use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use crate::cache::DeploymentCache;
use crate::engine::{DeploymentResult, InstanceResult, QueryResult, WorkflowEngine};
use crate::xml;

/// Coordinates deployments against the workflow engine
#[derive(Debug, Clone)]
pub struct DeploymentManager {
    /// Engine client
    engine: Arc<dyn WorkflowEngine>,

    /// Cache of deployed definition metadata
    cache: DeploymentCache,
}

impl DeploymentManager {
    /// Create a new deployment manager
    pub fn new(engine: Arc<dyn WorkflowEngine>, cache: DeploymentCache) -> Self {
        Self { engine, cache }
    }

    /// Resource file name for a diagram: spaces become underscores and the
    /// `.bpmn` suffix is appended. No other characters are escaped.
    pub fn resource_name(diagram_name: &str) -> String {
        format!("{}.bpmn", diagram_name.replace(' ', "_"))
    }

    /// Deploy a diagram's XML under its derived resource name.
    ///
    /// The XML is normalized to be executable first; on success the raw
    /// engine response is folded into the cache before the result is
    /// returned to the caller unchanged.
    pub async fn deploy_diagram(&self, name: &str, xml_content: &str) -> DeploymentResult {
        let resource_name = Self::resource_name(name);
        let span = info_span!("deploy_diagram", %resource_name);
        async move {
            info!("Deploying diagram");

            let normalized = xml::ensure_executable(xml_content);
            let result = self.engine.deploy(&normalized, &resource_name).await;

            if result.success {
                if let Some(data) = &result.data {
                    self.cache.merge_response(data).await;
                }
            } else {
                warn!(status = ?result.status, "Deployment failed");
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Start an instance of a deployed process.
    pub async fn create_instance(
        &self,
        process_id: &str,
        variables: Map<String, Value>,
    ) -> InstanceResult {
        self.engine.create_instance(process_id, variables).await
    }

    /// List process instances, optionally filtered by process id.
    pub async fn list_instances(&self, process_id: Option<&str>) -> QueryResult {
        self.engine.query_instances(process_id).await
    }

    /// List deployed process definitions, preferring the live monitoring
    /// service.
    ///
    /// When the live query fails, cached deployment metadata stands in,
    /// tagged with `source: "cache"` so callers can flag stale data. The
    /// fallback counts as a success only when the cache holds something.
    pub async fn list_definitions(&self) -> QueryResult {
        let live = self.engine.query_definitions().await;
        if live.success {
            return live;
        }

        info!("Definition search unavailable, serving cached deployments");
        let cached = self.cache.read().await;
        QueryResult {
            success: !cached.is_empty(),
            data: Some(json!({ "items": cached })),
            message: live.message,
            source: Some("cache".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_name_replaces_spaces_and_appends_suffix() {
        assert_eq!(
            DeploymentManager::resource_name("Order Flow"),
            "Order_Flow.bpmn"
        );
        assert_eq!(DeploymentManager::resource_name("invoice"), "invoice.bpmn");
        assert_eq!(
            DeploymentManager::resource_name("a b c"),
            "a_b_c.bpmn"
        );
    }
}
