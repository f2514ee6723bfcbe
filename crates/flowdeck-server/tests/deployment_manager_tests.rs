//! Tests for the deployment orchestration layer with a mocked engine.

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use flowdeck_server::engine::{DeploymentResult, InstanceResult, QueryResult, WorkflowEngine};
use flowdeck_server::{DeploymentCache, DeploymentManager};
use flowdeck_store::memory::InMemoryDeploymentStore;
use flowdeck_store::DeploymentStore;

// Mock the workflow engine
mock! {
    #[derive(Debug)]
    pub Engine {}

    #[async_trait]
    impl WorkflowEngine for Engine {
        async fn deploy(&self, xml_content: &str, resource_name: &str) -> DeploymentResult;
        async fn create_instance(&self, process_id: &str, variables: Map<String, Value>) -> InstanceResult;
        async fn query_instances(&self, process_id: Option<&str>) -> QueryResult;
        async fn query_definitions(&self) -> QueryResult;
    }
}

fn deploy_response() -> Value {
    json!({
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
    })
}

fn manager_with(
    engine: MockEngine,
) -> (DeploymentManager, Arc<InMemoryDeploymentStore>) {
    let store = Arc::new(InMemoryDeploymentStore::new());
    let cache = DeploymentCache::new(store.clone());
    (DeploymentManager::new(Arc::new(engine), cache), store)
}

#[tokio::test]
async fn deploy_normalizes_xml_and_derives_the_resource_name() {
    let mut engine = MockEngine::new();
    engine
        .expect_deploy()
        .withf(|xml, resource_name| {
            resource_name == "Order_Flow.bpmn"
                && xml.contains(r#"<bpmn:process isExecutable="true" id="P1">"#)
        })
        .times(1)
        .returning(|_, _| DeploymentResult::ok("Process deployed successfully", deploy_response()));

    let (manager, _store) = manager_with(engine);

    let result = manager
        .deploy_diagram("Order Flow", r#"<bpmn:process id="P1"></bpmn:process>"#)
        .await;

    assert!(result.success);
}

#[tokio::test]
async fn successful_deploy_merges_the_cache() {
    let mut engine = MockEngine::new();
    engine
        .expect_deploy()
        .returning(|_, _| DeploymentResult::ok("Process deployed successfully", deploy_response()));

    let (manager, store) = manager_with(engine);

    manager
        .deploy_diagram("Order Flow", r#"<bpmn:process id="P1"/>"#)
        .await;

    let records = store.read_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records["123"].id, "P1");
    assert_eq!(records["123"].name, "Order_Flow.bpmn");
    assert_eq!(records["123"].version, 2);
}

#[tokio::test]
async fn failed_deploy_leaves_the_cache_untouched() {
    let mut engine = MockEngine::new();
    engine
        .expect_deploy()
        .returning(|_, _| DeploymentResult::rejected("Failed to deploy process: bad xml", 400));

    let (manager, store) = manager_with(engine);

    let result = manager
        .deploy_diagram("Broken", "<not-bpmn/>")
        .await;

    assert!(!result.success);
    assert_eq!(result.status, Some(400));
    assert!(store.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_definitions_prefers_the_live_engine() {
    let mut engine = MockEngine::new();
    engine
        .expect_query_definitions()
        .times(1)
        .returning(|| QueryResult::ok(json!({ "items": [{ "bpmnProcessId": "P1" }] })));

    let (manager, _store) = manager_with(engine);

    let result = manager.list_definitions().await;

    assert!(result.success);
    assert!(result.source.is_none());
    assert_eq!(
        result.data,
        Some(json!({ "items": [{ "bpmnProcessId": "P1" }] }))
    );
}

#[tokio::test]
async fn list_definitions_falls_back_to_cached_deployments() {
    let mut engine = MockEngine::new();
    engine
        .expect_deploy()
        .returning(|_, _| DeploymentResult::ok("Process deployed successfully", deploy_response()));
    engine
        .expect_query_definitions()
        .returning(|| QueryResult::failed("Error: connection refused"));

    let (manager, _store) = manager_with(engine);
    manager
        .deploy_diagram("Order Flow", r#"<bpmn:process id="P1"/>"#)
        .await;

    let result = manager.list_definitions().await;

    assert!(result.success);
    assert_eq!(result.source.as_deref(), Some("cache"));
    let items = &result.data.unwrap()["items"];
    assert_eq!(items["123"]["processDefinitionId"], "P1");
    assert_eq!(items["123"]["version"], 2);
}

#[tokio::test]
async fn list_definitions_with_empty_cache_reports_failure() {
    let mut engine = MockEngine::new();
    engine
        .expect_query_definitions()
        .returning(|| QueryResult::failed("Error: connection refused"));

    let (manager, _store) = manager_with(engine);

    let result = manager.list_definitions().await;

    assert!(!result.success);
    assert_eq!(result.source.as_deref(), Some("cache"));
    assert_eq!(result.data, Some(json!({ "items": {} })));
}

#[tokio::test]
async fn instance_calls_pass_through_to_the_engine() {
    let mut engine = MockEngine::new();
    engine
        .expect_create_instance()
        .withf(|process_id, variables| process_id == "P1" && variables.contains_key("orderId"))
        .times(1)
        .returning(|_, _| {
            InstanceResult::ok(
                "Process instance created successfully",
                json!({ "processInstanceKey": 9001 }),
            )
        });
    engine
        .expect_query_instances()
        .times(1)
        .returning(|_| QueryResult::ok(json!({ "items": [] })));

    let (manager, _store) = manager_with(engine);

    let mut variables = Map::new();
    variables.insert("orderId".to_string(), json!(42));
    let created = manager.create_instance("P1", variables).await;
    assert!(created.success);

    let listed = manager.list_instances(Some("P1")).await;
    assert!(listed.success);
}
