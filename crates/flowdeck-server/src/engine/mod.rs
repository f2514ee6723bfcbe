//! Workflow engine integration
//!
//! This module contains the engine contract and the typed outcome records
//! every engine call resolves to. Engine calls never return `Err`: transport
//! failures, timeouts, and remote rejections are all folded into the result,
//! so callers branch on `success` instead of handling exceptions.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;

pub mod zeebe;

/// Outcome of a deployment call
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    pub success: bool,
    pub message: String,
    /// Engine response body, verbatim, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// HTTP status when the engine was reachable but rejected the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl DeploymentResult {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: None,
        }
    }

    pub fn rejected(message: impl Into<String>, status: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status: Some(status),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status: None,
        }
    }
}

/// Outcome of an instance-creation call
#[derive(Debug, Clone, Serialize)]
pub struct InstanceResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InstanceResult {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Outcome of a search call
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set to `"cache"` when the data did not come from the live engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl QueryResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            source: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            source: None,
        }
    }
}

/// Interface to the workflow engine cluster: the gateway's ingestion
/// endpoints plus the monitoring service's read API.
#[async_trait]
pub trait WorkflowEngine: Send + Sync + Debug {
    /// Deploy a BPMN resource through the gateway.
    async fn deploy(&self, xml_content: &str, resource_name: &str) -> DeploymentResult;

    /// Start a new instance of a deployed process. Variables pass through to
    /// the engine unmodified.
    async fn create_instance(&self, process_id: &str, variables: Map<String, Value>)
        -> InstanceResult;

    /// Search process instances in the monitoring service, optionally
    /// filtered by process id.
    async fn query_instances(&self, process_id: Option<&str>) -> QueryResult;

    /// Search deployed process definitions in the monitoring service.
    async fn query_definitions(&self) -> QueryResult;
}
