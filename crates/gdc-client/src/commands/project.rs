//! `gdc create-project` and `gdc delete-project` command implementations

use crate::error::Result;
use crate::gdc::GdcClient;
use colored::Colorize;

pub async fn create(client: &GdcClient, title: &str, summary: &str, token: &str) -> Result<()> {
    let project = client.create_project(title, summary, token).await?;
    println!("{} Created project {}", "✓".green(), title.bold());
    println!("  Id: {}", project.id());
    Ok(())
}

pub async fn delete(client: &GdcClient, project: &str) -> Result<()> {
    client.project(project).delete().await?;
    println!("{} Deleted project {}", "✓".green(), project);
    Ok(())
}
