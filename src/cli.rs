use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "intellicare", version, about = "IntelliCare - AI symptom checker and triage front-end")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides config and INTELLICARE_API__BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file to use instead of the default search path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only in the log)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a symptom-check conversation (default)
    Chat {
        /// Skip the splash sequence
        #[arg(long)]
        no_splash: bool,
    },
    /// Browse the five triage levels
    Levels,
    /// Check that the backend is reachable
    Health,
    /// Show what the backend has collected for a session
    Session { session_id: String },
    /// Launch the desktop app
    #[cfg(feature = "tauri-app")]
    App,
}
