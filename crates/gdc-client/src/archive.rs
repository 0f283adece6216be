//! Upload archive packaging
//!
//! An upload is a zip holding the CSV rows (`data.csv`) and the SLI manifest
//! (`upload_info.json`) that maps CSV columns onto the project's data model.
//! Archives live in temp files that are removed when the [`PackagedArchive`] is dropped.

use crate::error::{GdcError, Result};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the archive inside a staging directory
pub const DEFAULT_ARCHIVE_NAME: &str = "upload.zip";

/// CSV entry inside the archive
pub const CSV_DATA_FILENAME: &str = "data.csv";

/// Manifest entry inside the archive
pub const MANIFEST_FILENAME: &str = "upload_info.json";

/// Content type used when uploading an archive
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// SLI manifest: the column definitions for one dataset upload
#[derive(Debug, Clone, PartialEq)]
pub struct SliManifest(Value);

impl SliManifest {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a manifest from its JSON text
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(raw)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl From<Value> for SliManifest {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A packaged archive on local disk. Dropping it deletes the file.
#[derive(Debug)]
pub struct PackagedArchive {
    file: NamedTempFile,
}

impl PackagedArchive {
    pub fn new(file: NamedTempFile) -> Self {
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Identifying name of the archive: its file name without extension
    pub fn name(&self) -> Result<String> {
        self.path()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                GdcError::Other(anyhow::anyhow!(
                    "archive path {} has no usable file name",
                    self.path().display()
                ))
            })
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.path())?)
    }
}

/// Produces upload archives from CSV data and a manifest
pub trait Archiver: Send + Sync {
    fn create_archive(&self, data: &str, manifest: &SliManifest) -> Result<PackagedArchive>;
}

/// Default archiver writing deflated zips into the system temp directory
#[derive(Debug, Clone)]
pub struct ZipArchiver {
    temp_dir: Option<PathBuf>,
    prefix: String,
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self {
            temp_dir: None,
            prefix: "gdc-upload-".to_string(),
        }
    }
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write archives into `dir` instead of the system temp directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn temp_file(&self) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.prefix).suffix(".zip");

        Ok(match self.temp_dir {
            Some(ref dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        })
    }
}

impl Archiver for ZipArchiver {
    fn create_archive(&self, data: &str, manifest: &SliManifest) -> Result<PackagedArchive> {
        let mut file = self.temp_file()?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut zip = ZipWriter::new(file.as_file_mut());
        zip.start_file(CSV_DATA_FILENAME, options)?;
        zip.write_all(data.as_bytes())?;
        zip.start_file(MANIFEST_FILENAME, options)?;
        zip.write_all(manifest.to_json_string()?.as_bytes())?;
        zip.finish()?;

        tracing::debug!(path = %file.path().display(), bytes = data.len(), "Packaged upload archive");

        Ok(PackagedArchive::new(file))
    }
}
