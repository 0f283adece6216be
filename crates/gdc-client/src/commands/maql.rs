//! `gdc maql` command implementation

use super::read_input;
use crate::error::Result;
use crate::gdc::GdcClient;
use colored::Colorize;
use std::path::Path;

/// Execute the MAQL in `file` against `project`
pub async fn run(client: &GdcClient, project: &str, file: &Path) -> Result<()> {
    let maql = read_input(file).await?;

    if client.project(project).execute_maql(&maql).await? {
        println!("{} MAQL applied to {}", "✓".green(), project.bold());
    } else {
        println!("{} MAQL produced no objects in {}", "!".yellow(), project.bold());
    }
    Ok(())
}
