//! Command-line interface for hubfs.

pub mod args;
mod command_context;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

pub use args::{CdnArg, GlobalArgs};
pub use command_context::CommandContext;

/// Errors that can occur during CLI execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("{0}")]
    Config(#[from] crate::config::ConfigError),

    /// Filesystem operation error.
    #[error("{0}")]
    Fs(#[from] crate::fs::FsError),

    /// Gateway error.
    #[error("{0}")]
    Gateway(#[from] crate::gateway::GatewayError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// hubfs - filesystem-style access to a hosted repository's contents.
#[derive(Parser, Debug)]
#[command(name = "hubfs", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List directory contents.
    Ls {
        /// Directory to list; the repository root when omitted.
        path: Option<String>,
        /// Recurse into subdirectories.
        #[arg(long)]
        deep: bool,
    },

    /// Print a file's contents to stdout.
    Cat { path: String },

    /// Write stdin (or a local file) to a path, as one commit.
    Put {
        path: String,
        /// Read content from this local file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Delete a file, as one commit.
    Rm { path: String },

    /// Create a directory by writing a placeholder file.
    Mkdir { path: String },

    /// Recursively delete a directory, one commit per contained file.
    Rmdir { path: String },

    /// Move a file (copy then delete; not atomic).
    Mv { source: String, destination: String },

    /// Copy a file.
    Cp { source: String, destination: String },

    /// Print a file's size, last-modified time and mime type.
    Stat { path: String },

    /// Check whether a path exists.
    Exists {
        path: String,
        /// Check for a directory instead of a file.
        #[arg(long)]
        dir: bool,
    },

    /// Print a public URL for a path.
    Url {
        path: String,
        /// Which CDN the URL should point at.
        #[arg(long, value_enum, default_value = "jsdelivr")]
        cdn: CdnArg,
    },

    /// Show API rate limit standing.
    #[command(name = "rate-limit")]
    RateLimit,
}

impl Cli {
    /// Parse command-line arguments and return the CLI instance.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext::new(&self.global)?;

        match self.command {
            Command::Ls { path, deep } => {
                commands::ls(&ctx, path.as_deref().unwrap_or(""), deep).await
            }
            Command::Cat { path } => commands::cat(&ctx, &path).await,
            Command::Put { path, input } => commands::put(&ctx, &path, input.as_ref()).await,
            Command::Rm { path } => commands::rm(&ctx, &path).await,
            Command::Mkdir { path } => commands::mkdir(&ctx, &path).await,
            Command::Rmdir { path } => commands::rmdir(&ctx, &path).await,
            Command::Mv {
                source,
                destination,
            } => commands::mv(&ctx, &source, &destination).await,
            Command::Cp {
                source,
                destination,
            } => commands::cp(&ctx, &source, &destination).await,
            Command::Stat { path } => commands::stat(&ctx, &path).await,
            Command::Exists { path, dir } => commands::exists(&ctx, &path, dir).await,
            Command::Url { path, cdn } => commands::url(&ctx, &path, cdn.into()),
            Command::RateLimit => commands::rate_limit(&ctx).await,
        }
    }
}

/// Main entry point for the CLI.
pub async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.run().await
}
