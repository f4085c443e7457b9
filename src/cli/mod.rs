// ABOUTME: CLI argument parsing and command routing for analysis-wizard
//
// Provides command-line interface for:
// - Launching the wizard TUI (tui, default)
// - Submitting an analysis without the TUI (submit)
// - Showing or initialising configuration (config)

pub mod config;
pub mod submit;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Guided wizard for submitting analysis requests
#[derive(Parser)]
#[command(name = "analysis-wizard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Extra config file, applied after the user and project configs
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enforce the attachment size limit regardless of config
    #[arg(long, global = true)]
    pub strict_file_size: bool,
}

/// Output format for commands
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default if no command given)
    Tui,

    /// Submit an analysis without the TUI
    Submit(SubmitArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the submit command
#[derive(clap::Args)]
pub struct SubmitArgs {
    /// Project name (at least 3 characters)
    #[arg(long, short)]
    pub name: String,

    /// What should be analysed (at least 10 characters)
    #[arg(long, short)]
    pub description: String,

    /// File to attach; repeat for several files
    #[arg(long, short)]
    pub file: Vec<PathBuf>,
}

/// Arguments for the config command
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Write the default configuration to ~/.analysis-wizard/config.toml
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file when used with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}
