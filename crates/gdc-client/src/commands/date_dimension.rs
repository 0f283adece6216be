//! `gdc date-dimension` command implementation

use crate::error::Result;
use crate::gdc::GdcClient;
use colored::Colorize;

pub async fn run(client: &GdcClient, project: &str, name: &str, include_time: bool) -> Result<()> {
    client
        .workflow(project)
        .create_date_dimension(name, include_time)
        .await?;

    let kind = if include_time { "Date and time dimensions" } else { "Date dimension" };
    println!("{} {} created: {}", "✓".green(), kind, name.bold());
    Ok(())
}
