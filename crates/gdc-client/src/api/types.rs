//! API request and response types
//!
//! Field names follow the platform's camelCase JSON.

use crate::error::{GdcError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MAQL execution request: `{"manage": {"maql": "..."}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManageRequest {
    pub manage: ManageBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManageBody {
    pub maql: String,
}

impl ManageRequest {
    pub fn new(maql: impl Into<String>) -> Self {
        Self {
            manage: ManageBody { maql: maql.into() },
        }
    }
}

/// MAQL execution response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManageResponse {
    pub uris: Vec<String>,
}

/// Integration trigger request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_integration: String,
}

/// Integration trigger response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub pull_task: Link,
}

/// A bare `{"uri": ...}` link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub uri: String,
}

/// Integration task status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
    pub task_status: String,
}

/// Dataset listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetsResponse {
    pub data_sets_info: DataSetsInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSetsInfo {
    #[serde(default)]
    pub sets: Vec<DataSet>,
}

/// One dataset entry. Fields the client does not interpret are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    pub meta: DataSetMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSetMeta {
    pub title: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// Project creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub project: NewProject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub meta: ProjectMeta,
    pub content: ProjectContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContent {
    pub authorization_token: String,
    pub guided_navigation: u8,
}

impl CreateProjectRequest {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        authorization_token: impl Into<String>,
    ) -> Self {
        Self {
            project: NewProject {
                meta: ProjectMeta {
                    title: title.into(),
                    summary: summary.into(),
                },
                content: ProjectContent {
                    authorization_token: authorization_token.into(),
                    guided_navigation: 1,
                },
            },
        }
    }
}

/// Decode a transport response into `T`, naming the call in the error.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| GdcError::unexpected(format!("{} response: {}", what, e)))
}
