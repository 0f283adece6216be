//! `gdc datasets` and `gdc delete-dataset` command implementations

use crate::error::Result;
use crate::gdc::GdcClient;
use colored::Colorize;

/// List the datasets of `project`
pub async fn list(client: &GdcClient, project: &str) -> Result<()> {
    let info = client.project(project).get_datasets().await?;

    if info.sets.is_empty() {
        println!("No datasets in project {}", project);
        return Ok(());
    }

    println!("{}", "Datasets:".cyan().bold());
    for set in &info.sets {
        println!("  {}", set.meta.title.green());
        println!("    URI: {}", set.meta.uri);
        if let Some(identifier) = &set.meta.identifier {
            println!("    Identifier: {}", identifier);
        }
    }
    println!();
    println!("Total: {}", info.sets.len());
    Ok(())
}

/// Delete the dataset titled `title`
pub async fn delete(client: &GdcClient, project: &str, title: &str) -> Result<()> {
    client.project(project).delete_dataset(title).await?;
    println!("{} Deleted dataset: {}", "✓".green(), title);
    Ok(())
}
