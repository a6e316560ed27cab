// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(all(not(debug_assertions), feature = "tauri-app"), windows_subsystem = "windows")]

mod cli;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use intellicare_lib::chat::TriageApiClient;
use intellicare_lib::config::AppConfig;
use intellicare_lib::logging::init_tracing;
use intellicare_lib::terminal::{browse_levels, TerminalApp};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("intellicare error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
        config.validate()?;
    }

    match cli.command.unwrap_or(Commands::Chat { no_splash: false }) {
        Commands::Chat { no_splash } => TerminalApp::new(config)?.run(no_splash).await,
        Commands::Levels => browse_levels(),
        Commands::Health => {
            let client = TriageApiClient::from_config(&config.api)?;
            let health = client
                .health()
                .await
                .with_context(|| format!("backend at {} is not reachable", client.base_url()))?;
            println!(
                "{} {} ({} active sessions, model {})",
                client.base_url(),
                health.status.bright_green(),
                health.active_sessions,
                health.model.as_deref().unwrap_or("unknown")
            );
            match client.service_info().await {
                Ok(info) => println!(
                    "{} {}",
                    info.service,
                    info.version.as_deref().unwrap_or("").bright_black()
                ),
                Err(e) => tracing::debug!(error = %e, "service info unavailable"),
            }
            Ok(())
        }
        Commands::Session { session_id } => {
            let client = TriageApiClient::from_config(&config.api)?;
            let info = client.session_info(&session_id).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        #[cfg(feature = "tauri-app")]
        Commands::App => {
            intellicare_lib::run(config);
            Ok(())
        }
    }
}
