//! Configuration for the Flowdeck Server
//!
//! This module contains the configuration types and loading functionality.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// Base URL of the engine gateway's REST API
    #[serde(default = "default_zeebe_rest_url")]
    pub zeebe_rest_url: String,

    /// Base URL of the gateway's actuator (management) port
    #[serde(default = "default_zeebe_actuator_url")]
    pub zeebe_actuator_url: String,

    /// Base URL of the monitoring (Operate-style) service
    #[serde(default = "default_operate_url")]
    pub operate_url: String,

    /// Base URL of the task (Tasklist-style) service
    #[serde(default = "default_tasklist_url")]
    pub tasklist_url: String,

    /// Base URL of the search index backing the monitoring service
    #[serde(default = "default_elasticsearch_url")]
    pub elasticsearch_url: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rolling expiration for cached deployment metadata, in days
    #[serde(default = "default_deployment_cache_ttl_days")]
    pub deployment_cache_ttl_days: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_zeebe_rest_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_zeebe_actuator_url() -> String {
    "http://localhost:9600".to_string()
}

fn default_operate_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_tasklist_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_elasticsearch_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_deployment_cache_ttl_days() -> u64 {
    7
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override from environment variables
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            } else {
                warn!("Invalid SERVER_PORT value: {}", port);
            }
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            config.bind_address = host;
        }

        if let Ok(zeebe_rest_url) = env::var("ZEEBE_REST_URL") {
            config.zeebe_rest_url = zeebe_rest_url;
        }

        if let Ok(zeebe_actuator_url) = env::var("ZEEBE_ACTUATOR_URL") {
            config.zeebe_actuator_url = zeebe_actuator_url;
        }

        if let Ok(operate_url) = env::var("OPERATE_URL") {
            config.operate_url = operate_url;
        }

        if let Ok(tasklist_url) = env::var("TASKLIST_URL") {
            config.tasklist_url = tasklist_url;
        }

        if let Ok(elasticsearch_url) = env::var("ELASTICSEARCH_URL") {
            config.elasticsearch_url = elasticsearch_url;
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Ok(ttl_days) = env::var("DEPLOYMENT_CACHE_TTL_DAYS") {
            if let Ok(days) = ttl_days.parse::<u64>() {
                config.deployment_cache_ttl_days = days;
            } else {
                warn!("Invalid DEPLOYMENT_CACHE_TTL_DAYS value: {}", ttl_days);
            }
        }

        // Validate required fields
        if config.zeebe_rest_url.is_empty() {
            return Err(ServerError::ConfigError(
                "Engine gateway URL is required".to_string(),
            ));
        }

        if config.operate_url.is_empty() {
            return Err(ServerError::ConfigError(
                "Monitoring service URL is required".to_string(),
            ));
        }

        info!("Loaded server configuration");
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            zeebe_rest_url: default_zeebe_rest_url(),
            zeebe_actuator_url: default_zeebe_actuator_url(),
            operate_url: default_operate_url(),
            tasklist_url: default_tasklist_url(),
            elasticsearch_url: default_elasticsearch_url(),
            log_level: default_log_level(),
            deployment_cache_ttl_days: default_deployment_cache_ttl_days(),
        }
    }
}
