//! Flowdeck Storage
//!
//! Provides the storage contracts used by the Flowdeck server: BPMN diagram
//! records authored in the editor, and the advisory cache of process
//! definitions last reported by the workflow engine. The in-memory
//! implementations in [`memory`] back tests and single-node deployments;
//! production deployments can substitute a shared backend behind the same
//! traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;

/// A BPMN diagram authored in the editor.
///
/// The deployment layer only ever reads `name` and `xml_content`; the rest
/// belongs to the CRUD surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmnDiagram {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub xml_content: String,
    pub version: String,
    pub is_published: bool,
    /// Opaque owner reference; ownership checks happen elsewhere.
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating or updating a diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub xml_content: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub owner: Option<String>,
}

/// Last-known metadata for a process definition, as reported by the engine
/// in a deployment response.
///
/// `version` is stored exactly as the engine reported it; versions are never
/// computed locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Engine-assigned definition key (stringified when numeric).
    #[serde(rename = "processDefinitionKey")]
    pub key: String,
    /// Process id used when creating instances.
    #[serde(rename = "processDefinitionId")]
    pub id: String,
    /// Display name: the resource file name, falling back to the process id.
    pub name: String,
    pub version: i64,
    #[serde(rename = "deployedAt")]
    pub deployed_at: DateTime<Utc>,
}

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Diagram not found: {0}")]
    DiagramNotFound(Uuid),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract for diagram persistence.
///
/// Deletes are soft: a deleted diagram keeps its record but drops out of
/// `get` and `list`.
#[async_trait]
pub trait DiagramStore: Send + Sync + Debug {
    async fn create(&self, draft: DiagramDraft) -> StoreResult<BpmnDiagram>;

    async fn get(&self, id: Uuid) -> StoreResult<BpmnDiagram>;

    /// All live diagrams, most recently updated first.
    async fn list(&self) -> StoreResult<Vec<BpmnDiagram>>;

    async fn update(&self, id: Uuid, draft: DiagramDraft) -> StoreResult<BpmnDiagram>;

    async fn soft_delete(&self, id: Uuid) -> StoreResult<()>;
}

/// Contract for the advisory store of deployed process definitions.
///
/// `merge` upserts only the supplied records and restarts the whole-store
/// expiration window; keys absent from a call survive untouched. Once the
/// window lapses the store reads as empty. The engine remains the source of
/// truth; this store only stands in when the engine's read path is down.
#[async_trait]
pub trait DeploymentStore: Send + Sync + Debug {
    async fn read_all(&self) -> StoreResult<HashMap<String, DeploymentRecord>>;

    async fn merge(&self, records: Vec<DeploymentRecord>) -> StoreResult<()>;

    async fn clear(&self) -> StoreResult<()>;
}
