//! Command-line argument definitions and helpers.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::ConfigSource;
use crate::fs::PublicUrlCdn;

/// Global arguments that apply to all commands.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to the configuration file.
    #[arg(long = "config-file", global = true)]
    pub config_file: Option<PathBuf>,

    /// Configuration overrides in the form section.key=value.
    #[arg(long = "config", value_parser = parse_config_override, global = true)]
    pub config_overrides: Vec<(String, String)>,

    /// Repository to operate on, as owner/name. Overrides the config file.
    #[arg(long, value_parser = parse_repository, global = true)]
    pub repository: Option<(String, String)>,

    /// Branch to operate on. Overrides the config file.
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Format output as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalArgs {
    /// Convert to a ConfigSource for reading configuration; the repository
    /// and branch shortcuts are folded in as overrides applied last.
    pub fn to_config_source(&self) -> ConfigSource {
        let mut overrides = self.config_overrides.clone();

        if let Some((owner, name)) = &self.repository {
            overrides.push(("repository.owner".to_string(), owner.clone()));
            overrides.push(("repository.name".to_string(), name.clone()));
        }
        if let Some(branch) = &self.branch {
            overrides.push(("repository.branch".to_string(), branch.clone()));
        }

        ConfigSource {
            config_file: self.config_file.clone(),
            overrides,
        }
    }
}

/// Parse a name=value config override.
fn parse_config_override(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid override '{}', expected key=value", s)),
    }
}

/// Parse an owner/name repository specification.
fn parse_repository(s: &str) -> Result<(String, String), String> {
    match s.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(format!("invalid repository '{}', expected owner/name", s)),
    }
}

/// CDN choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CdnArg {
    /// jsDelivr; works without a configured branch.
    #[default]
    Jsdelivr,
    /// Raw repository content; requires a configured branch.
    Raw,
}

impl From<CdnArg> for PublicUrlCdn {
    fn from(arg: CdnArg) -> Self {
        match arg {
            CdnArg::Jsdelivr => PublicUrlCdn::JsDelivr,
            CdnArg::Raw => PublicUrlCdn::GithubRaw,
        }
    }
}
