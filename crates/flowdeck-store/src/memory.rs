//! In-memory implementations of the Flowdeck stores
//!
//! These implementations keep everything in process memory behind an
//! `RwLock`. They back tests and development servers; all data is lost when
//! the instance is dropped.

use crate::{
    BpmnDiagram, DeploymentRecord, DeploymentStore, DiagramDraft, DiagramStore, StoreError,
    StoreResult,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default expiration window for deployment metadata: 7 days from the last
/// write.
pub const DEFAULT_DEPLOYMENT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// In-memory implementation of [`DiagramStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiagramStore {
    diagrams: Arc<RwLock<HashMap<Uuid, BpmnDiagram>>>,
}

impl InMemoryDiagramStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiagramStore for InMemoryDiagramStore {
    async fn create(&self, draft: DiagramDraft) -> StoreResult<BpmnDiagram> {
        let now = Utc::now();
        let diagram = BpmnDiagram {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            xml_content: draft.xml_content,
            version: draft.version.unwrap_or_else(|| "1.0".to_string()),
            is_published: draft.is_published.unwrap_or(false),
            owner: draft.owner,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let mut store = self.diagrams.write().await;
        store.insert(diagram.id, diagram.clone());

        Ok(diagram)
    }

    async fn get(&self, id: Uuid) -> StoreResult<BpmnDiagram> {
        let store = self.diagrams.read().await;

        match store.get(&id) {
            Some(diagram) if diagram.deleted_at.is_none() => Ok(diagram.clone()),
            _ => Err(StoreError::DiagramNotFound(id)),
        }
    }

    async fn list(&self) -> StoreResult<Vec<BpmnDiagram>> {
        let store = self.diagrams.read().await;

        let mut diagrams: Vec<BpmnDiagram> = store
            .values()
            .filter(|diagram| diagram.deleted_at.is_none())
            .cloned()
            .collect();
        diagrams.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(diagrams)
    }

    async fn update(&self, id: Uuid, draft: DiagramDraft) -> StoreResult<BpmnDiagram> {
        let mut store = self.diagrams.write().await;

        let diagram = match store.get_mut(&id) {
            Some(diagram) if diagram.deleted_at.is_none() => diagram,
            _ => return Err(StoreError::DiagramNotFound(id)),
        };

        diagram.name = draft.name;
        diagram.description = draft.description;
        diagram.xml_content = draft.xml_content;
        if let Some(version) = draft.version {
            diagram.version = version;
        }
        if let Some(is_published) = draft.is_published {
            diagram.is_published = is_published;
        }
        diagram.updated_at = Utc::now();

        Ok(diagram.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> StoreResult<()> {
        let mut store = self.diagrams.write().await;

        match store.get_mut(&id) {
            Some(diagram) if diagram.deleted_at.is_none() => {
                diagram.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(StoreError::DiagramNotFound(id)),
        }
    }
}

/// Contents of the deployment store plus its expiration deadline.
#[derive(Debug, Default)]
struct DeploymentMap {
    records: HashMap<String, DeploymentRecord>,
    expires_at: Option<Instant>,
}

impl DeploymentMap {
    fn expire_if_due(&mut self) {
        if let Some(deadline) = self.expires_at {
            if Instant::now() >= deadline {
                self.records.clear();
                self.expires_at = None;
            }
        }
    }
}

/// In-memory implementation of [`DeploymentStore`]
///
/// Every merge restarts the expiration window for the whole map; a store
/// that has gone `ttl` without a write reads as empty.
#[derive(Debug, Clone)]
pub struct InMemoryDeploymentStore {
    inner: Arc<RwLock<DeploymentMap>>,
    ttl: Duration,
}

impl InMemoryDeploymentStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_DEPLOYMENT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DeploymentMap::default())),
            ttl,
        }
    }
}

impl Default for InMemoryDeploymentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeploymentStore for InMemoryDeploymentStore {
    async fn read_all(&self) -> StoreResult<HashMap<String, DeploymentRecord>> {
        let mut inner = self.inner.write().await;
        inner.expire_if_due();

        Ok(inner.records.clone())
    }

    async fn merge(&self, records: Vec<DeploymentRecord>) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.expire_if_due();

        for record in records {
            inner.records.insert(record.key.clone(), record);
        }
        inner.expires_at = Some(Instant::now() + self.ttl);

        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.records.clear();
        inner.expires_at = None;

        Ok(())
    }
}
