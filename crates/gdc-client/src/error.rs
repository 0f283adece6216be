//! Error types for the GDC client
//!
//! Every operation returns [`Result`]. Integration failures (`UploadFailed`), lookup misses
//! (`DataSetNotFound`) and transport faults (`Http`, `Status`) are distinct variants so callers
//! can tell them apart without string matching.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, GdcError>;

/// Error type for client operations
#[derive(Error, Debug)]
pub enum GdcError {
    /// Project handle is unusable, typically because deletion could not reach the server
    #[error("Project '{0}' could not be opened. Check the project id and your credentials.")]
    ProjectNotOpened(String),

    /// Named dataset is absent from the project's listing
    #[error("DataSet {0} not found")]
    DataSetNotFound(String),

    /// Integration task finished in ERROR or WARNING
    #[error("Upload failed: integration task finished with status {status}")]
    UploadFailed { status: String },

    /// Integration task did not reach a terminal state in time
    #[error("Integration task {task_uri} still running after {elapsed:?}")]
    IntegrationTimeout { task_uri: String, elapsed: Duration },

    /// Caller cancelled a long-running wait
    #[error("Cancelled while waiting for {0}")]
    Cancelled(String),

    /// Request could not be sent or its body could not be read
    #[error("Network request failed: {0}. Check your connection and server URL.")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Server returned {status} for {method} {uri}")]
    Status {
        method: String,
        uri: String,
        status: u16,
    },

    /// Decoded response is missing a field the protocol requires
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or flags.")]
    Config(String),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build upload archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GdcError {
    /// Create an upload failure carrying the terminal task status
    pub fn upload_failed(status: impl Into<String>) -> Self {
        Self::UploadFailed {
            status: status.into(),
        }
    }

    /// Create an unexpected response error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures of the transport itself: unreachable host, broken connection
    /// or a non-success HTTP status.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

impl From<gdc_common::CommonError> for GdcError {
    fn from(err: gdc_common::CommonError) -> Self {
        Self::Config(err.to_string())
    }
}
