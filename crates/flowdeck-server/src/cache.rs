//! Advisory cache of deployed process definitions
//!
//! The gateway has no endpoint that lists previously deployed definitions,
//! so the metadata from each successful deploy response is kept in an
//! injected store and served when the monitoring service cannot be reached.
//! The store is advisory only; the engine remains the source of truth.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use flowdeck_store::{DeploymentRecord, DeploymentStore};

/// Cache of last-known deployed process definitions
#[derive(Debug, Clone)]
pub struct DeploymentCache {
    store: Arc<dyn DeploymentStore>,
}

impl DeploymentCache {
    pub fn new(store: Arc<dyn DeploymentStore>) -> Self {
        Self { store }
    }

    /// Record the process definitions described by a deploy response.
    ///
    /// Only the keys present in the response are touched; a response may
    /// cover a subset of known processes and earlier entries must survive.
    /// Store failures are logged and swallowed: the deploy itself already
    /// succeeded and its result must reach the caller unchanged.
    pub async fn merge_response(&self, data: &Value) {
        let records = records_from_response(data);
        if records.is_empty() {
            return;
        }

        debug!(count = records.len(), "Caching deployed definitions");
        if let Err(err) = self.store.merge(records).await {
            warn!(?err, "Failed to cache deployment metadata");
        }
    }

    /// Last-known deployed definitions, keyed by definition key. Empty once
    /// the store has expired or when it was never populated.
    pub async fn read(&self) -> HashMap<String, DeploymentRecord> {
        match self.store.read_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(?err, "Failed to read deployment cache");
                HashMap::new()
            }
        }
    }
}

/// Extract one record per process definition mentioned in a deploy response.
fn records_from_response(data: &Value) -> Vec<DeploymentRecord> {
    let deployments = match data.get("deployments").and_then(Value::as_array) {
        Some(deployments) => deployments,
        None => return Vec::new(),
    };

    let now = Utc::now();
    deployments
        .iter()
        .filter_map(|entry| entry.get("processDefinition"))
        .filter_map(|definition| record_from_definition(definition, now))
        .collect()
}

/// Build a record from one `processDefinition` entry.
///
/// Fallback rules: the engine-assigned key falls back to the process id,
/// the display name prefers the resource file name, and a missing version
/// means the first one. Entries carrying neither key nor id are skipped.
fn record_from_definition(
    definition: &Value,
    deployed_at: DateTime<Utc>,
) -> Option<DeploymentRecord> {
    let id = string_field(definition, "processDefinitionId");
    let key = string_field(definition, "processDefinitionKey").or_else(|| id.clone())?;
    let id = id.unwrap_or_else(|| key.clone());
    let name = string_field(definition, "resourceName").unwrap_or_else(|| id.clone());
    let version = definition
        .get("processDefinitionVersion")
        .and_then(Value::as_i64)
        .unwrap_or(1);

    Some(DeploymentRecord {
        key,
        id,
        name,
        version,
        deployed_at,
    })
}

/// String-or-number field accessor; the engine reports definition keys as
/// numbers.
fn string_field(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_store::memory::InMemoryDeploymentStore;
    use serde_json::json;

    #[test]
    fn parses_a_full_deployment_response() {
        let data = json!({
            "deployments": [
                {
                    "processDefinition": {
                        "processDefinitionKey": 123,
                        "processDefinitionId": "P1",
                        "resourceName": "Order_Flow.bpmn",
                        "processDefinitionVersion": 2
                    }
                }
            ]
        });

        let records = records_from_response(&data);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "123");
        assert_eq!(records[0].id, "P1");
        assert_eq!(records[0].name, "Order_Flow.bpmn");
        assert_eq!(records[0].version, 2);
    }

    #[test]
    fn key_falls_back_to_process_id() {
        let data = json!({
            "deployments": [
                { "processDefinition": { "processDefinitionId": "P1" } }
            ]
        });

        let records = records_from_response(&data);

        assert_eq!(records[0].key, "P1");
        assert_eq!(records[0].name, "P1");
        assert_eq!(records[0].version, 1);
    }

    #[test]
    fn skips_entries_without_a_definition_handle() {
        let data = json!({
            "deployments": [
                { "processDefinition": { "resourceName": "orphan.bpmn" } },
                { "decisionDefinition": { "decisionDefinitionId": "D1" } }
            ]
        });

        assert!(records_from_response(&data).is_empty());
    }

    #[test]
    fn tolerates_shapeless_responses() {
        assert!(records_from_response(&json!({})).is_empty());
        assert!(records_from_response(&json!({ "deployments": 7 })).is_empty());
        assert!(records_from_response(&json!([])).is_empty());
    }

    #[tokio::test]
    async fn merge_keeps_entries_absent_from_the_response() {
        let store = Arc::new(InMemoryDeploymentStore::new());
        let cache = DeploymentCache::new(store);

        cache
            .merge_response(&json!({
                "deployments": [
                    { "processDefinition": { "processDefinitionKey": 1, "processDefinitionId": "A" } }
                ]
            }))
            .await;
        cache
            .merge_response(&json!({
                "deployments": [
                    { "processDefinition": { "processDefinitionKey": 2, "processDefinitionId": "B" } }
                ]
            }))
            .await;

        let records = cache.read().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records["1"].id, "A");
        assert_eq!(records["2"].id, "B");
    }

    #[tokio::test]
    async fn merge_overwrites_redescribed_keys() {
        let store = Arc::new(InMemoryDeploymentStore::new());
        let cache = DeploymentCache::new(store);

        cache
            .merge_response(&json!({
                "deployments": [
                    { "processDefinition": { "processDefinitionKey": 1, "processDefinitionId": "A", "processDefinitionVersion": 1 } }
                ]
            }))
            .await;
        cache
            .merge_response(&json!({
                "deployments": [
                    { "processDefinition": { "processDefinitionKey": 1, "processDefinitionId": "A", "processDefinitionVersion": 2 } }
                ]
            }))
            .await;

        let records = cache.read().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records["1"].version, 2);
        assert_eq!(records["1"].id, "A");
    }
}
