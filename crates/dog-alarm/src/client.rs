//! The alarm client: configuration, signing, dispatch.

use serde_json::{Map, Value};
use url::Url;

use crate::config::{AlarmConfig, ConfigProvider, HttpOptions};
use crate::error::{InvalidArgument, Result};
use crate::payload;
use crate::receiver::Receiver;
use crate::response;
use crate::AlarmLevel;

/// Base URI used when the host configures none.
pub const DEFAULT_BASE_URI: &str = "http://alarm-dog-service.domain.com";

/// Client for an alarm-dog aggregation service.
///
/// Owns the resolved configuration and the HTTP transport. `&self`
/// operations build an ephemeral signed request each and are safe to issue
/// concurrently; the setters take `&mut self` and belong to initialization
/// time.
///
/// # Examples
///
/// ```no_run
/// use dog_alarm::AlarmClient;
///
/// # async fn run() -> dog_alarm::Result<()> {
/// let mut client = AlarmClient::new();
/// client.set_taskid(123)?;
/// client.set_token("the-shared-secret");
///
/// let response = client
///     .report(serde_json::json!({"text": "cpu load > 0.9"}), None, None, None)
///     .await?;
/// println!("status: {}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AlarmClient {
    taskid: Option<u64>,
    token: Option<String>,
    base_uri: String,
    http: HttpOptions,
    client: reqwest::Client,
}

impl AlarmClient {
    /// A client with default base URI and transport; `taskid` and `token`
    /// must be set before any request.
    pub fn new() -> Self {
        Self {
            taskid: None,
            token: None,
            base_uri: DEFAULT_BASE_URI.to_string(),
            http: HttpOptions::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Builds a client from resolved configuration values, validating each
    /// through the corresponding setter.
    pub fn from_config(config: AlarmConfig) -> std::result::Result<Self, InvalidArgument> {
        let mut client = Self::new();
        if let Some(taskid) = config.taskid {
            client.set_taskid(taskid)?;
        }
        if let Some(token) = config.token {
            client.set_token(token);
        }
        client.set_base_uri(&config.base_uri)?;
        client.set_http_options(config.http)?;
        Ok(client)
    }

    /// Builds a client from a host configuration layer (keys `dog.taskid`,
    /// `dog.token`, `dog.base_uri`, `dog.http`).
    pub fn from_provider(
        provider: &dyn ConfigProvider,
    ) -> std::result::Result<Self, InvalidArgument> {
        Self::from_config(AlarmConfig::from_provider(provider)?)
    }

    pub fn set_taskid(&mut self, taskid: u64) -> std::result::Result<&mut Self, InvalidArgument> {
        if taskid == 0 {
            return Err(InvalidArgument::InvalidTaskid);
        }
        self.taskid = Some(taskid);
        Ok(self)
    }

    pub fn taskid(&self) -> Option<u64> {
        self.taskid
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Validates and stores the service base URI; one trailing `/` is
    /// stripped so path joining stays predictable.
    pub fn set_base_uri(
        &mut self,
        base_uri: &str,
    ) -> std::result::Result<&mut Self, InvalidArgument> {
        if Url::parse(base_uri).is_err() {
            return Err(InvalidArgument::InvalidBaseUri(base_uri.to_string()));
        }
        let base_uri = base_uri.strip_suffix('/').unwrap_or(base_uri);
        self.base_uri = base_uri.to_string();
        Ok(self)
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Stores transport options and rebuilds the HTTP client from them.
    pub fn set_http_options(
        &mut self,
        options: HttpOptions,
    ) -> std::result::Result<&mut Self, InvalidArgument> {
        self.client = options
            .build_client()
            .map_err(|e| InvalidArgument::InvalidHttpOptions(e.to_string()))?;
        self.http = options;
        Ok(self)
    }

    pub fn http_options(&self) -> &HttpOptions {
        &self.http
    }

    /// Reports an alarm.
    ///
    /// `content` must be a keyed JSON object; `notice_time`, `level` and
    /// `receiver` are optional and omitted from the wire when unset. The
    /// raw transport response is returned uninterpreted — how to read
    /// status and body is the caller's decision. Transport failures
    /// classify as [`AlarmError::Sending`](crate::AlarmError::Sending).
    pub async fn report(
        &self,
        content: Value,
        notice_time: Option<i64>,
        level: Option<AlarmLevel>,
        receiver: Option<&Receiver>,
    ) -> Result<reqwest::Response> {
        let request =
            payload::build_report(self.taskid, self.token(), content, notice_time, level, receiver)?;
        let uri = format!("{}/alarm/report", self.base_uri);
        tracing::debug!(taskid = request.taskid, uri = %uri, "reporting alarm");

        let response = self.client.post(&uri).json(&request).send().await?;
        Ok(response)
    }

    /// Sends a test alarm and interprets the verdict.
    ///
    /// Unlike [`report`](Self::report) the response is resolved before
    /// returning: the result is always either the decoded JSON object or a
    /// classified error.
    pub async fn test(&self) -> Result<Map<String, Value>> {
        let request = payload::build_test(self.taskid, self.token())?;
        let uri = format!("{}/alarm/test", self.base_uri);
        tracing::debug!(taskid = request.taskid, uri = %uri, "sending test alarm");

        let response = self.client.post(&uri).json(&request).send().await?;
        response::resolve_response(response).await
    }
}

impl Default for AlarmClient {
    fn default() -> Self {
        Self::new()
    }
}
