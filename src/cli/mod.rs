//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod sync;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{
    load_config, merge_cli_overrides, CliOverrides, ConfigError, Credentials, SyncConfig,
};
use crate::error::SyncError;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// tokensync - Sync Figma design token variables into CSS and JS
#[derive(Parser)]
#[command(name = "tokensync")]
#[command(about = "Audit Figma design token variables, fix them in Figma, and generate CSS and JS artifacts")]
#[command(version)]
pub struct Cli {
    /// Path to tokensync.toml (default: searched upward from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Figma file key and access token
#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Figma file key
    #[arg(long, env = "FIGMA_FILE_KEY", hide_env_values = true)]
    pub file_key: Option<String>,

    /// Figma personal access token
    #[arg(long, env = "FIGMA_PAT", hide_env_values = true)]
    pub token: Option<String>,
}

impl CredentialArgs {
    fn resolve(&self) -> Result<Credentials, ConfigError> {
        Credentials::new(self.file_key.clone(), self.token.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, audit, write corrections back to Figma and generate artifacts
    Sync {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Read published variables instead of local ones
        #[arg(long)]
        published: bool,

        /// Figma API host (overrides remote.host)
        #[arg(long)]
        host: Option<String>,

        /// Do not write corrections back to Figma (artifacts are still generated)
        #[arg(long)]
        skip_write: bool,

        /// Output directory for artifacts and snapshots
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Fetch and audit only; nothing is written
    Audit {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Read published variables instead of local ones
        #[arg(long)]
        published: bool,

        /// Figma API host (overrides remote.host)
        #[arg(long)]
        host: Option<String>,

        /// Print findings and the correction payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate artifacts offline from a saved response snapshot
    Generate {
        /// Snapshot file (e.g. generated/lastRawFigmaSuccessResponse.json)
        snapshot: PathBuf,

        /// Output directory for artifacts
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Load tokensync.toml and apply command-line overrides.
pub(crate) fn load_settings(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<SyncConfig, ConfigError> {
    let mut config = load_config(config_path)?;
    merge_cli_overrides(&mut config, overrides)?;
    Ok(config)
}

fn exit_code_for(err: &SyncError) -> u8 {
    match err {
        SyncError::Config(ConfigError::MissingCredentials(_))
        | SyncError::Config(ConfigError::Validation(_)) => EXIT_INVALID_ARGS,
        _ => EXIT_ERROR,
    }
}

/// Print an error and map it to an exit code.
pub(crate) fn report_error(err: &SyncError) -> ExitCode {
    eprintln!("Error: {}", err);
    ExitCode::from(exit_code_for(err))
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    // Load .env before parsing so clap can read credentials from it
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Sync { credentials, published, host, skip_write, out } => {
            sync::run_sync(config, &credentials, published, host, skip_write, out)
        }
        Commands::Audit { credentials, published, host, json } => {
            sync::run_audit(config, &credentials, published, host, json)
        }
        Commands::Generate { snapshot, out } => generate::run_generate(config, &snapshot, out),
    }
}
