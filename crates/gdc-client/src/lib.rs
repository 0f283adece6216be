//! GoodData Client Library
//!
//! Client for an analytics platform's project API: project management, MAQL schema execution,
//! dataset uploads through a WebDAV staging area and polling of the resulting integration tasks.
//!
//! # Overview
//!
//! - **Transport**: [`api::Transport`] is the only way the crate talks to the network;
//!   [`api::ApiClient`] is the `reqwest` implementation.
//! - **Archiving**: [`archive::Archiver`] packages CSV data and its manifest;
//!   [`archive::ZipArchiver`] writes a temporary zip.
//! - **Uploads**: [`upload::UploadWorkflow`] runs schema, staging, integration and cleanup.
//! - **CLI**: the `gdc` binary wires all of the above (`gdc upload`, `gdc maql`, ...).

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod archive;
pub mod commands;
pub mod config;
pub mod date_dimension;
pub mod error;
pub mod gdc;
pub mod integration;
pub mod project;
pub mod staging;
pub mod template;
pub mod upload;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use archive::{Archiver, SliManifest, ZipArchiver};
pub use config::{ClientConfig, SchemaErrorPolicy};
pub use error::{GdcError, Result};
pub use gdc::GdcClient;
pub use integration::{IntegrationPoller, PollOptions, TaskStatus};
pub use project::Project;
pub use staging::StagingUploader;
pub use upload::UploadWorkflow;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gdc - GoodData project and upload client
#[derive(Parser, Debug)]
#[command(name = "gdc")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Platform API URL
    #[arg(long, env = "GDC_SERVER_URL", default_value = config::DEFAULT_SERVER_URL, global = true)]
    pub server_url: String,

    /// WebDAV staging URL
    #[arg(long, env = "GDC_STAGING_URL", default_value = config::DEFAULT_STAGING_URL, global = true)]
    pub staging_url: String,

    /// Account login
    #[arg(short, long, env = "GDC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password
    #[arg(short, long, env = "GDC_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Delay between integration status checks, in milliseconds
    #[arg(long, env = "GDC_POLL_INTERVAL_MS", default_value_t = config::DEFAULT_POLL_INTERVAL_MS, global = true)]
    pub poll_interval_ms: u64,

    /// Give up waiting for an integration after this many seconds
    #[arg(long, env = "GDC_INTEGRATION_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Schema error handling: swallow or propagate
    #[arg(long, env = "GDC_SCHEMA_ERRORS", default_value = "swallow", global = true)]
    pub schema_errors: String,
}

impl Cli {
    /// Client configuration assembled from flags and their environment fallbacks
    pub fn client_config(&self) -> Result<ClientConfig> {
        let config = ClientConfig {
            server_url: self.server_url.clone(),
            staging_url: self.staging_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            poll_interval_ms: self.poll_interval_ms,
            integration_timeout_secs: self.timeout,
            schema_errors: self.schema_errors.parse()?,
            ..ClientConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply MAQL, then upload and integrate a CSV file
    Upload {
        /// Project id
        project: String,

        /// CSV data file
        #[arg(long)]
        data: PathBuf,

        /// Upload manifest (upload_info.json)
        #[arg(long)]
        manifest: PathBuf,

        /// MAQL file applied before the upload
        #[arg(long)]
        maql: Option<PathBuf>,
    },

    /// Execute MAQL against a project
    Maql {
        /// Project id
        project: String,

        /// File holding the MAQL statements
        file: PathBuf,
    },

    /// List a project's datasets
    Datasets {
        /// Project id
        project: String,
    },

    /// Delete a dataset by title
    DeleteDataset {
        /// Project id
        project: String,

        /// Dataset title
        title: String,
    },

    /// Create a date dimension, optionally with a time-of-day dimension
    DateDimension {
        /// Project id
        project: String,

        /// Dimension name
        name: String,

        /// Also create and populate the time dimension
        #[arg(long)]
        include_time: bool,
    },

    /// Integrate an already staged directory
    Integrate {
        /// Project id
        project: String,

        /// Staging directory name
        dir: String,

        /// Return once the task is accepted
        #[arg(long)]
        no_wait: bool,
    },

    /// Create a project
    CreateProject {
        /// Project title
        title: String,

        /// Project summary
        #[arg(long, default_value = "")]
        summary: String,

        /// Authorization token for project creation
        #[arg(long, env = "GDC_AUTH_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Delete a project
    DeleteProject {
        /// Project id
        project: String,
    },
}
