//! Shared setup for command execution.

use crate::config::read_config;
use crate::fs::RepoFs;
use crate::gateway::{GithubGateway, GithubGatewayConfig};

use super::args::GlobalArgs;
use super::Result;

/// Everything a command needs: the constructed filesystem adapter and the
/// chosen output mode.
pub struct CommandContext {
    pub fs: RepoFs<GithubGateway>,
    pub json: bool,
}

impl CommandContext {
    /// Resolve configuration and build the adapter. Credential problems and
    /// missing required fields surface here, before any remote call.
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let config = read_config(&global.to_config_source())?;

        let gateway = GithubGateway::new(
            GithubGatewayConfig::new(config.coordinate())
                .with_credentials(config.credentials.clone()),
        )?;

        let fs = RepoFs::new(config.coordinate(), gateway)
            .with_committer(config.committer.clone())
            .with_prefix(config.prefix());

        Ok(Self {
            fs,
            json: global.json,
        })
    }
}
