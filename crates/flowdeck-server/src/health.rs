//! Cluster health aggregation
//!
//! This module probes the four sub-services of the engine cluster and folds
//! the results into a single report.

use reqwest::{redirect, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Timeout for each health probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Health of each sub-service in the engine cluster.
///
/// Every flag is exactly true or false: a timeout, connection error, or
/// unexpected status all read as unhealthy. Reports are computed fresh per
/// request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub zeebe: bool,
    pub operate: bool,
    pub tasklist: bool,
    pub elasticsearch: bool,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.zeebe && self.operate && self.tasklist && self.elasticsearch
    }
}

/// Probes the engine cluster's sub-services independently
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    /// Gateway actuator base URL
    actuator_url: String,

    /// Monitoring service base URL
    monitoring_url: String,

    /// Task service base URL
    tasklist_url: String,

    /// Search index base URL
    elasticsearch_url: String,

    /// HTTP client
    client: Client,
}

impl HealthAggregator {
    /// Create a new HealthAggregator
    pub fn new(
        actuator_url: String,
        monitoring_url: String,
        tasklist_url: String,
        elasticsearch_url: String,
    ) -> Self {
        // Redirects are left unfollowed: the monitoring and task services
        // answer their root path with a 302 to their UI, and that redirect
        // is the liveness signal.
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            actuator_url,
            monitoring_url,
            tasklist_url,
            elasticsearch_url,
            client,
        }
    }

    /// Probe all four services.
    ///
    /// Probes are independent: one unreachable service never masks the state
    /// of the others. They run concurrently; ordering is irrelevant since
    /// the aggregate is a pure AND.
    pub async fn check(&self) -> HealthReport {
        let (zeebe, operate, tasklist, elasticsearch) = tokio::join!(
            self.probe(format!("{}/actuator/health", self.actuator_url), false),
            self.probe(format!("{}/", self.monitoring_url), true),
            self.probe(format!("{}/", self.tasklist_url), true),
            self.probe(format!("{}/_cluster/health", self.elasticsearch_url), false),
        );

        let report = HealthReport {
            zeebe,
            operate,
            tasklist,
            elasticsearch,
        };
        debug!(?report, "Cluster health probed");
        report
    }

    async fn probe(&self, url: String, redirect_is_healthy: bool) -> bool {
        match self.client.get(&url).send().await {
            Ok(response) => {
                response.status().is_success()
                    || (redirect_is_healthy && response.status() == StatusCode::FOUND)
            }
            Err(_) => false,
        }
    }
}
