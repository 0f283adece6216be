//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function taking the configured client.

pub mod datasets;
pub mod date_dimension;
pub mod integrate;
pub mod maql;
pub mod project;
pub mod upload;

use crate::error::Result;
use std::path::Path;

/// Read a text input named on the command line
pub(crate) async fn read_input(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}
