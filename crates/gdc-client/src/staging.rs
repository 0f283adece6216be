//! WebDAV staging of upload archives
//!
//! Each upload gets its own collection under `/uploads/` named after the archive.
//! The collection is remote state owned by whoever called [`StagingUploader::stage`];
//! nothing here removes it on failure.

use crate::api::endpoints;
use crate::api::transport::{Body, Host, Method, Transport, TransportRequest};
use crate::archive::{
    Archiver, PackagedArchive, SliManifest, ARCHIVE_CONTENT_TYPE, DEFAULT_ARCHIVE_NAME,
};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Places packaged archives on the staging host
#[derive(Clone)]
pub struct StagingUploader {
    transport: Arc<dyn Transport>,
    archiver: Arc<dyn Archiver>,
}

impl StagingUploader {
    pub fn new(transport: Arc<dyn Transport>, archiver: Arc<dyn Archiver>) -> Self {
        Self {
            transport,
            archiver,
        }
    }

    /// Package `data` with `manifest` and upload it into a fresh staging directory.
    ///
    /// Returns the directory name, which is what the integration trigger refers to.
    /// The local archive is removed before returning, whether or not the upload succeeded.
    /// A failed upload leaves the created directory in place; callers that need to clean it
    /// up drive [`package`](Self::package), [`create_dir`](Self::create_dir) and
    /// [`put_archive`](Self::put_archive) themselves.
    #[instrument(skip_all)]
    pub async fn stage(&self, data: &str, manifest: &SliManifest) -> Result<String> {
        let archive = self.package(data, manifest)?;
        let dir_name = archive.name()?;

        self.create_dir(&dir_name).await?;
        self.put_archive(&dir_name, &archive).await?;
        Ok(dir_name)
    }

    /// Build the local archive for one upload
    pub fn package(&self, data: &str, manifest: &SliManifest) -> Result<PackagedArchive> {
        self.archiver.create_archive(data, manifest)
    }

    /// Create the staging directory `dir_name`
    pub async fn create_dir(&self, dir_name: &str) -> Result<()> {
        self.transport
            .request(
                TransportRequest::new(Method::Mkcol, endpoints::staging_dir_uri(dir_name))
                    .on(Host::Staging),
            )
            .await?;
        debug!(dir = %dir_name, "Created staging directory");
        Ok(())
    }

    /// Upload `archive` as `upload.zip` into the existing directory `dir_name`
    pub async fn put_archive(&self, dir_name: &str, archive: &PackagedArchive) -> Result<()> {
        let bytes = archive.read_bytes()?;
        let size = bytes.len();

        self.transport
            .request(
                TransportRequest::new(
                    Method::Put,
                    endpoints::staging_file_uri(dir_name, DEFAULT_ARCHIVE_NAME),
                )
                .on(Host::Staging)
                .with_header("Content-Type", ARCHIVE_CONTENT_TYPE)
                .with_body(Body::Bytes(bytes)),
            )
            .await?;

        info!(dir = %dir_name, bytes = size, "Staged upload archive");
        Ok(())
    }

    /// Remove a staging directory and everything in it
    pub async fn delete_staged(&self, dir_name: &str) -> Result<()> {
        self.transport
            .request(TransportRequest::delete(endpoints::staging_dir_uri(dir_name)).on(Host::Staging))
            .await?;
        debug!(dir = %dir_name, "Deleted staging directory");
        Ok(())
    }
}
