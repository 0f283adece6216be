//! `gdc integrate` command implementation
//!
//! Integrates a directory that is already on the staging host. The directory is left in
//! place; only `gdc upload` removes what it staged.

use crate::error::Result;
use crate::gdc::GdcClient;
use colored::Colorize;

pub async fn run(client: &GdcClient, project: &str, dir: &str, wait: bool) -> Result<()> {
    client.workflow(project).poller().integrate(dir, wait).await?;

    if wait {
        println!("{} Integrated {} into {}", "✓".green(), dir, project.bold());
    } else {
        println!("{} Integration of {} started", "✓".green(), dir);
    }
    Ok(())
}
