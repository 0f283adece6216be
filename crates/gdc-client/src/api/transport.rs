//! Transport abstraction
//!
//! Every component receives an `Arc<dyn Transport>` instead of reaching for a shared
//! connection. Responses come back decoded: a JSON body as its value, an empty body as
//! `Value::Null`, anything else as `Value::String`.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Which server a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Host {
    /// Metadata / REST API host
    #[default]
    Api,
    /// WebDAV staging host for uploads
    Staging,
}

/// HTTP method, including the WebDAV collection verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Mkcol,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Mkcol => "MKCOL",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
}

/// A single request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub uri: String,
    pub host: Host,
    pub body: Body,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            host: Host::Api,
            body: Body::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::Get, uri)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::Delete, uri)
    }

    pub fn post_json(uri: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, uri).with_body(Body::Json(body))
    }

    pub fn on(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Issues authenticated requests and decodes the responses.
///
/// Implementations return `GdcError::Http` or `GdcError::Status` for transport failures;
/// callers rely on [`crate::GdcError::is_transport`] to recognise them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: TransportRequest) -> Result<Value>;
}
