//! Zeebe-compatible engine client
//!
//! This module provides the REST integration with the engine gateway
//! (deployments, process instances) and the monitoring service
//! (instance and definition search).

use async_trait::async_trait;
use reqwest::{header, multipart, redirect, Client};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{DeploymentResult, InstanceResult, QueryResult, WorkflowEngine};

/// Timeout for engine calls.
const ENGINE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the lightweight session-priming request.
const SESSION_TIMEOUT: Duration = Duration::from_secs(5);

/// REST client for a Zeebe-compatible gateway and its monitoring service
#[derive(Debug, Clone)]
pub struct ZeebeEngineClient {
    /// Gateway REST base URL
    gateway_url: String,

    /// Monitoring service base URL
    monitoring_url: String,

    /// HTTP client
    client: Client,
}

impl ZeebeEngineClient {
    /// Create a new ZeebeEngineClient
    pub fn new(gateway_url: String, monitoring_url: String) -> Self {
        // Redirects stay unfollowed: the monitoring root answers with a 302
        // to its UI, and the only thing that request is for is its cookies.
        let client = Client::builder()
            .timeout(ENGINE_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            gateway_url,
            monitoring_url,
            client,
        }
    }

    /// Get the URL for the gateway's deployment endpoint
    fn deployments_url(&self) -> String {
        format!("{}/v2/deployments", self.gateway_url)
    }

    /// Get the URL for the gateway's instance-creation endpoint
    fn process_instances_url(&self) -> String {
        format!("{}/v2/process-instances", self.gateway_url)
    }

    /// Get the URL for the monitoring service's instance search
    fn instance_search_url(&self) -> String {
        format!("{}/v1/process-instances/search", self.monitoring_url)
    }

    /// Get the URL for the monitoring service's definition search
    fn definition_search_url(&self) -> String {
        format!("{}/v1/process-definitions/search", self.monitoring_url)
    }

    /// Get the monitoring service's root URL
    fn monitoring_root_url(&self) -> String {
        format!("{}/", self.monitoring_url)
    }
}

#[async_trait]
impl WorkflowEngine for ZeebeEngineClient {
    async fn deploy(&self, xml_content: &str, resource_name: &str) -> DeploymentResult {
        info!(%resource_name, "Deploying BPMN resource");

        // The v2 deployment API takes multipart/form-data with the BPMN
        // document as a named file part.
        let part = multipart::Part::bytes(xml_content.as_bytes().to_vec())
            .file_name(resource_name.to_string());
        let form = multipart::Form::new().part("resources", part);

        let response = match self
            .client
            .post(self.deployments_url())
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(?err, "Deployment request failed");
                return DeploymentResult::failed(format!("Deployment error: {}", err));
            }
        };

        if response.status().is_success() {
            let data = match response.json::<Value>().await {
                Ok(data) => data,
                Err(err) => {
                    error!(?err, "Failed to parse deployment response");
                    return DeploymentResult::failed(format!("Deployment error: {}", err));
                }
            };

            info!("Process deployed successfully");
            DeploymentResult::ok("Process deployed successfully", data)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Gateway rejected deployment");
            DeploymentResult::rejected(format!("Failed to deploy process: {}", body), status)
        }
    }

    async fn create_instance(
        &self,
        process_id: &str,
        variables: Map<String, Value>,
    ) -> InstanceResult {
        info!(%process_id, "Creating process instance");

        let body = json!({
            "processDefinitionId": process_id,
            "variables": variables,
        });

        let response = match self
            .client
            .post(self.process_instances_url())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(?err, "Create instance request failed");
                return InstanceResult::failed(format!("Error: {}", err));
            }
        };

        if response.status().is_success() {
            match response.json::<Value>().await {
                Ok(data) => InstanceResult::ok("Process instance created successfully", data),
                Err(err) => InstanceResult::failed(format!("Error: {}", err)),
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(%process_id, "Engine rejected instance creation");
            InstanceResult::failed(format!("Failed to create process instance: {}", body))
        }
    }

    async fn query_instances(&self, process_id: Option<&str>) -> QueryResult {
        debug!(?process_id, "Searching process instances");

        let query = match process_id {
            Some(id) => json!({ "filter": { "bpmnProcessId": id } }),
            None => json!({}),
        };

        let response = match self
            .client
            .post(self.instance_search_url())
            .json(&query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(?err, "Instance search request failed");
                return QueryResult::failed(format!("Error: {}", err));
            }
        };

        if response.status().is_success() {
            match response.json::<Value>().await {
                Ok(data) => QueryResult::ok(data),
                Err(err) => QueryResult::failed(format!("Error: {}", err)),
            }
        } else {
            QueryResult::failed("Failed to fetch process instances")
        }
    }

    async fn query_definitions(&self) -> QueryResult {
        debug!("Searching process definitions");

        // The monitoring service issues session cookies on first contact and
        // rejects search requests arriving without them, so the search is a
        // mandatory two-step: prime a session against the root, then carry
        // its cookies on the actual request.
        let session = match self
            .client
            .get(self.monitoring_root_url())
            .timeout(SESSION_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(?err, "Monitoring session request failed");
                return QueryResult::failed(format!("Error: {}", err));
            }
        };

        let cookies: Vec<String> = session
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(str::to_string)
            .collect();

        let mut request = self.client.post(self.definition_search_url()).json(&json!({}));
        if !cookies.is_empty() {
            request = request.header(header::COOKIE, cookies.join("; "));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(?err, "Definition search request failed");
                return QueryResult::failed(format!("Error: {}", err));
            }
        };

        if response.status().is_success() {
            match response.json::<Value>().await {
                Ok(data) => QueryResult::ok(data),
                Err(err) => QueryResult::failed(format!("Error: {}", err)),
            }
        } else {
            let status = response.status();
            warn!(%status, "Monitoring service rejected definition search");
            QueryResult::failed(format!("Failed to fetch process definitions: {}", status))
        }
    }
}
