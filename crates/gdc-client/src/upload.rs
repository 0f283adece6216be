//! Upload workflow
//!
//! `upload_dataset` runs MAQL, stages the data, integrates it and removes the staging
//! directory. Once the directory has been created it is removed on every path, including a
//! failed archive upload and a failed integration, so no upload leaves a directory behind on
//! the staging host.

use crate::archive::{Archiver, SliManifest};
use crate::date_dimension::{date_maql, dimension_identifier, TimeDimension};
use crate::error::Result;
use crate::integration::{IntegrationPoller, PollOptions};
use crate::project::Project;
use crate::staging::StagingUploader;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Runs dataset uploads for one project
#[derive(Clone)]
pub struct UploadWorkflow {
    project: Project,
    stager: StagingUploader,
    poller: IntegrationPoller,
}

impl UploadWorkflow {
    pub fn new(project: Project, archiver: Arc<dyn Archiver>) -> Self {
        let transport = project.transport();
        Self {
            stager: StagingUploader::new(transport.clone(), archiver),
            poller: IntegrationPoller::new(transport, project.id()),
            project,
        }
    }

    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.poller = self.poller.with_options(options);
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn stager(&self) -> &StagingUploader {
        &self.stager
    }

    pub fn poller(&self) -> &IntegrationPoller {
        &self.poller
    }

    /// Apply `maql`, then load `data` described by `manifest` into the project.
    #[instrument(skip_all, fields(project = %self.project.id()))]
    pub async fn upload_dataset(&self, maql: &str, data: &str, manifest: &SliManifest) -> Result<()> {
        let changed = self.project.execute_maql(maql).await?;
        debug!(changed, "Schema statements applied");

        self.upload_data(data, manifest).await?;
        info!("Dataset uploaded");
        Ok(())
    }

    /// Create a date dimension named `name`; with `include_time`, also create and populate
    /// the matching time-of-day dimension.
    #[instrument(skip(self), fields(project = %self.project.id()))]
    pub async fn create_date_dimension(&self, name: &str, include_time: bool) -> Result<()> {
        dimension_identifier(name)?;

        self.project
            .execute_maql(&date_maql(Some(name), include_time))
            .await?;

        if !include_time {
            return Ok(());
        }

        let time = TimeDimension::resolve(name)?;
        self.upload_data(&time.data, &time.manifest).await?;
        info!("Time dimension populated");
        Ok(())
    }

    /// Stage, integrate and clean up `data` without touching the schema.
    ///
    /// If both the upload and the cleanup fail, the upload error is returned.
    pub async fn upload_data(&self, data: &str, manifest: &SliManifest) -> Result<()> {
        let archive = self.stager.package(data, manifest)?;
        let dir_name = archive.name()?;
        self.stager.create_dir(&dir_name).await?;

        let put = self.stager.put_archive(&dir_name, &archive).await;
        drop(archive);

        let uploaded = match put {
            Ok(()) => self.poller.integrate(&dir_name, true).await,
            Err(err) => Err(err),
        };
        let cleaned = self.stager.delete_staged(&dir_name).await;

        match (uploaded, cleaned) {
            (Ok(()), cleaned) => cleaned,
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                warn!(dir = %dir_name, error = %cleanup_err, "Failed to remove staging directory");
                Err(err)
            },
        }
    }
}
