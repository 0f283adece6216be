//! In-memory transport for unit tests
//!
//! Answers the handful of endpoints the upload workflow touches and records every request.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::api::transport::{Method, Transport, TransportRequest};
use crate::error::{GdcError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const PROJECT_ID: &str = "p1";
pub const TASK_URI: &str = "/gdc/md/p1/etl/task/42";

#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<TransportRequest>>,
    statuses: Mutex<VecDeque<String>>,
    failures: Mutex<HashMap<(Method, Option<String>), u16>>,
    responses: Mutex<HashMap<String, Value>>,
}

impl MockTransport {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        let mock = Self::default();
        mock.statuses
            .lock()
            .unwrap()
            .extend(statuses.iter().map(|s| s.to_string()));
        mock
    }

    /// Answer every `method` request with HTTP `status`
    pub fn fail_on(&self, method: Method, status: u16) {
        self.failures.lock().unwrap().insert((method, None), status);
    }

    /// Answer `method` requests whose URI contains `uri_part` with HTTP `status`
    pub fn fail_on_uri(&self, method: Method, uri_part: &str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert((method, Some(uri_part.to_string())), status);
    }

    /// Fixed response for a URI
    pub fn respond(&self, uri: &str, body: Value) {
        self.responses.lock().unwrap().insert(uri.to_string(), body);
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `method` requests whose URI contains `uri_part`
    pub fn count(&self, method: Method, uri_part: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.uri.contains(uri_part))
            .count()
    }

    fn failure_for(&self, request: &TransportRequest) -> Option<u16> {
        self.failures
            .lock()
            .unwrap()
            .iter()
            .find(|((method, part), _)| {
                *method == request.method
                    && part.as_deref().map_or(true, |p| request.uri.contains(p))
            })
            .map(|(_, status)| *status)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: TransportRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(status) = self.failure_for(&request) {
            return Err(GdcError::Status {
                method: request.method.to_string(),
                uri: request.uri,
                status,
            });
        }

        if let Some(body) = self.responses.lock().unwrap().get(&request.uri) {
            return Ok(body.clone());
        }

        match request.method {
            Method::Post if request.uri.ends_with("/etl/pull") => {
                Ok(json!({"pullTask": {"uri": TASK_URI}}))
            },
            Method::Post if request.uri.ends_with("/ldm/manage") => {
                Ok(json!({"uris": ["/gdc/md/p1/obj/1"]}))
            },
            Method::Get if request.uri == TASK_URI => {
                let status = self
                    .statuses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("task polled more often than scripted");
                Ok(json!({"taskStatus": status}))
            },
            _ => Ok(Value::Null),
        }
    }
}
