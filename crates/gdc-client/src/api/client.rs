//! HTTP transport for the platform API
//!
//! `reqwest`-backed [`Transport`] that addresses the API host and the WebDAV staging host.

use crate::api::transport::{Body, Host, Method, Transport, TransportRequest};
use crate::config::ClientConfig;
use crate::error::{GdcError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for a single API request in seconds.
/// Uploads of large archives go through the same client, hence the generous value.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 300;

/// Static credentials sent as HTTP basic auth
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// API client for the platform and its staging host
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    staging_url: String,
    credentials: Option<Credentials>,
}

impl ApiClient {
    /// Create a new API client with the default request timeout
    pub fn new(api_url: impl Into<String>, staging_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(
            api_url,
            staging_url,
            Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        )
    }

    /// Create a new API client with an explicit per-request timeout
    pub fn with_timeout(
        api_url: impl Into<String>,
        staging_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            staging_url: staging_url.into(),
            credentials: None,
        })
    }

    /// Create from a loaded client configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Self::with_timeout(
            config.server_url.clone(),
            config.staging_url.clone(),
            Duration::from_secs(config.api_timeout_secs),
        )?;

        Ok(match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                client.with_credentials(username.clone(), password.clone())
            },
            (Some(_), None) | (None, Some(_)) => {
                warn!("Only one of username/password configured, sending requests unauthenticated");
                client
            },
            (None, None) => client,
        })
    }

    /// Attach basic-auth credentials to every request
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.credentials = Some(Credentials { username, password });
        self
    }

    /// Get the API base URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the staging base URL
    pub fn staging_url(&self) -> &str {
        &self.staging_url
    }

    fn url_for(&self, host: Host, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return uri.to_string();
        }

        let base = match host {
            Host::Api => &self.api_url,
            Host::Staging => &self.staging_url,
        };

        format!("{}{}", base.trim_end_matches('/'), uri)
    }

    /// Credentials to send to `url`; only URLs under a configured base get them
    fn credentials_for(&self, url: &str) -> Option<&Credentials> {
        let under = |base: &str| {
            let base = base.trim_end_matches('/');
            url == base || url.strip_prefix(base).is_some_and(|rest| rest.starts_with('/'))
        };

        self.credentials
            .as_ref()
            .filter(|_| under(&self.api_url) || under(&self.staging_url))
    }
}

fn to_reqwest_method(method: Method) -> Result<reqwest::Method> {
    Ok(match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Mkcol => {
            reqwest::Method::from_bytes(method.as_str().as_bytes()).map_err(anyhow::Error::from)?
        },
    })
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[async_trait]
impl Transport for ApiClient {
    async fn request(&self, request: TransportRequest) -> Result<Value> {
        let url = self.url_for(request.host, &request.uri);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method)?, &url)
            .header(ACCEPT, "application/json");

        match self.credentials_for(&url) {
            Some(creds) => builder = builder.basic_auth(&creds.username, Some(&creds.password)),
            None if self.credentials.is_some() => {
                warn!(url = %url, "Not sending credentials to a host outside the configured servers")
            },
            None => {},
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Bytes(bytes) => builder.body(bytes),
        };

        debug!(method = %request.method, url = %url, "Sending request");

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GdcError::Status {
                method: request.method.to_string(),
                uri: request.uri,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(decode_body(&bytes))
    }
}
