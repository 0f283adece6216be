//! gdc CLI - Main entry point

use clap::Parser;
use gdc_client::{commands, Cli, Commands, GdcClient};
use gdc_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("gdc")
        .build();

    // Environment variables take precedence
    let log_config = log_config.merge_env().unwrap_or_else(|e| {
        eprintln!("Ignoring invalid logging environment: {}", e);
        LogConfig::builder().level(level).output(LogOutput::Console).build()
    });

    // CLI should work without logging
    let _guard = init_logging(&log_config).ok();

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping integration wait");
            on_ctrl_c.cancel();
        }
    });

    if let Err(e) = execute_command(&cli, cancel).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, cancel: CancellationToken) -> gdc_client::Result<()> {
    let client = GdcClient::new(cli.client_config()?)?.with_cancellation(cancel);

    match &cli.command {
        Commands::Upload {
            project,
            data,
            manifest,
            maql,
        } => commands::upload::run(&client, project, data, manifest, maql.as_deref()).await,

        Commands::Maql { project, file } => commands::maql::run(&client, project, file).await,

        Commands::Datasets { project } => commands::datasets::list(&client, project).await,

        Commands::DeleteDataset { project, title } => {
            commands::datasets::delete(&client, project, title).await
        },

        Commands::DateDimension {
            project,
            name,
            include_time,
        } => commands::date_dimension::run(&client, project, name, *include_time).await,

        Commands::Integrate {
            project,
            dir,
            no_wait,
        } => commands::integrate::run(&client, project, dir, !*no_wait).await,

        Commands::CreateProject {
            title,
            summary,
            token,
        } => commands::project::create(&client, title, summary, token).await,

        Commands::DeleteProject { project } => commands::project::delete(&client, project).await,
    }
}
