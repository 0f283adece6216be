//! `gdc upload` command implementation
//!
//! Applies optional MAQL, then stages, integrates and cleans up one CSV upload.

use super::read_input;
use crate::archive::SliManifest;
use crate::error::Result;
use crate::gdc::GdcClient;
use colored::Colorize;
use std::path::Path;

/// Upload `data` described by `manifest` into `project`
pub async fn run(
    client: &GdcClient,
    project: &str,
    data: &Path,
    manifest: &Path,
    maql: Option<&Path>,
) -> Result<()> {
    let maql = match maql {
        Some(path) => read_input(path).await?,
        None => String::new(),
    };
    let data_csv = read_input(data).await?;
    let manifest = SliManifest::from_json_str(&read_input(manifest).await?)?;

    let workflow = client.workflow(project);
    if maql.trim().is_empty() {
        // nothing to apply, go straight to the upload
        workflow.upload_data(&data_csv, &manifest).await?;
    } else {
        workflow.upload_dataset(&maql, &data_csv, &manifest).await?;
    }

    println!(
        "{} Uploaded {} into project {}",
        "✓".green(),
        data.display(),
        project.bold()
    );
    Ok(())
}
