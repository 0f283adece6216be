//! Shared helpers for integration tests
//!
//! Mounts the platform and staging endpoints one upload touches on a single wiremock server.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use gdc_client::{ClientConfig, GdcClient};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const PROJECT_ID: &str = "p1";
pub const TASK_PATH: &str = "/gdc/md/p1/etl/task/7";

/// Client pointed at `server` for both API and staging traffic
pub fn client_for(server: &MockServer) -> GdcClient {
    let config = ClientConfig {
        server_url: server.uri(),
        staging_url: server.uri(),
        username: Some("analyst@example.com".into()),
        password: Some("secret".into()),
        poll_interval_ms: 10,
        ..ClientConfig::default()
    };
    GdcClient::new(config).unwrap()
}

pub fn manifest_json() -> Value {
    json!({
        "dataSetSLIManifest": {
            "file": "data.csv",
            "dataSet": "dataset.sales",
            "parts": [{"columnName": "id", "populates": ["label.sales.id"], "mode": "FULL"}]
        }
    })
}

/// MKCOL, PUT and DELETE on any staging directory
pub async fn mount_staging(server: &MockServer) {
    Mock::given(method("MKCOL"))
        .and(path_regex(r"^/uploads/[^/]+$"))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/uploads/[^/]+/upload\.zip$"))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/uploads/[^/]+$"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

/// MAQL execution answering with one created object
pub async fn mount_maql(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/gdc/md/p1/ldm/manage"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"uris": ["/gdc/md/p1/obj/1"]})),
        )
        .mount(server)
        .await;
}

/// Integration trigger plus a task reporting `statuses` in order
pub async fn mount_integration(server: &MockServer, statuses: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/gdc/md/p1/etl/pull"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"pullTask": {"uri": TASK_PATH}})),
        )
        .mount(server)
        .await;

    for status in statuses {
        Mock::given(method("GET"))
            .and(path(TASK_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"taskStatus": status})))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }
}

/// Number of received requests with `verb` whose path starts with `prefix`
pub async fn received(server: &MockServer, verb: &str, prefix: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path().starts_with(prefix))
        .count()
}
