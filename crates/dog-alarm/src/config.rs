//! Configuration surface: resolved values only, injected by the host.
//!
//! The client never probes a framework for configuration. Hosts either
//! fill an [`AlarmConfig`] directly or implement [`ConfigProvider`] over
//! their own config layer and hand it to
//! [`AlarmClient::from_provider`](crate::client::AlarmClient::from_provider).

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvalidArgument;

/// Narrow key/value view over a host configuration store.
pub trait ConfigProvider {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn set(&mut self, key: &str, value: Value);
}

/// In-memory [`ConfigProvider`] for hosts without a config layer and for
/// tests.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    entries: HashMap<String, Value>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigProvider for MapConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_pool_max_idle_per_host() -> usize {
    8
}

/// Transport options passed through to the HTTP client unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpOptions {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

impl HttpOptions {
    pub(crate) fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()
    }
}

fn default_base_uri() -> String {
    crate::client::DEFAULT_BASE_URI.to_string()
}

/// Resolved client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default)]
    pub taskid: Option<u64>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    #[serde(default)]
    pub http: HttpOptions,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            taskid: None,
            token: None,
            base_uri: default_base_uri(),
            http: HttpOptions::default(),
        }
    }
}

impl AlarmConfig {
    /// Reads `dog.taskid`, `dog.token`, `dog.base_uri` and `dog.http` from
    /// a host configuration layer. Absent keys keep their defaults; present
    /// keys with unusable values fail.
    pub fn from_provider(provider: &dyn ConfigProvider) -> Result<Self, InvalidArgument> {
        let mut config = Self::default();

        if let Some(value) = provider.get("dog.taskid") {
            let taskid = value
                .as_u64()
                .filter(|taskid| *taskid != 0)
                .ok_or(InvalidArgument::InvalidTaskid)?;
            config.taskid = Some(taskid);
        }
        if let Some(value) = provider.get("dog.token") {
            if let Some(token) = value.as_str() {
                config.token = Some(token.to_string());
            }
        }
        if let Some(value) = provider.get("dog.base_uri") {
            let base_uri = value
                .as_str()
                .ok_or_else(|| InvalidArgument::InvalidBaseUri(value.to_string()))?;
            config.base_uri = base_uri.to_string();
        }
        if let Some(value) = provider.get("dog.http") {
            config.http = serde_json::from_value(value)
                .map_err(|e| InvalidArgument::InvalidHttpOptions(e.to_string()))?;
        }

        Ok(config)
    }
}
