//! Client entry point
//!
//! [`GdcClient`] wires the HTTP transport and the zip archiver from a [`ClientConfig`] and
//! hands out project handles and upload workflows that share them.

use crate::api::client::ApiClient;
use crate::api::transport::Transport;
use crate::archive::{Archiver, ZipArchiver};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::integration::PollOptions;
use crate::project::Project;
use crate::upload::UploadWorkflow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct GdcClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    archiver: Arc<dyn Archiver>,
    cancel: CancellationToken,
}

impl GdcClient {
    /// Build a client talking to the servers named in `config`
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(ApiClient::from_config(&config)?);
        Ok(Self::with_parts(config, transport, Arc::new(ZipArchiver::new())))
    }

    /// Build a client from explicit collaborators
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        archiver: Arc<dyn Archiver>,
    ) -> Self {
        Self {
            config,
            transport,
            archiver,
            cancel: CancellationToken::new(),
        }
    }

    /// Cancel integration waits through `cancel` instead of a private token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    pub fn project(&self, id: impl Into<String>) -> Project {
        Project::new(self.transport.clone(), id).with_schema_error_policy(self.config.schema_errors)
    }

    pub async fn create_project(
        &self,
        title: &str,
        summary: &str,
        authorization_token: &str,
    ) -> Result<Project> {
        let project =
            Project::create(self.transport.clone(), title, summary, authorization_token).await?;
        Ok(project.with_schema_error_policy(self.config.schema_errors))
    }

    /// Poll settings derived from the configuration
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::default()
            .with_interval(self.config.poll_interval())
            .with_timeout(self.config.integration_timeout())
            .with_cancel(self.cancel.clone())
    }

    pub fn workflow(&self, project_id: impl Into<String>) -> UploadWorkflow {
        UploadWorkflow::new(self.project(project_id), self.archiver.clone())
            .with_poll_options(self.poll_options())
    }
}
