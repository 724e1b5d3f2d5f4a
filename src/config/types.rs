//! Configuration types.
//!
//! Structures representing application configuration as parsed from an
//! INI-format config file.

use crate::gateway::{Committer, Credentials, RepoCoordinate};

/// [repository] section - which repository to operate on.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Account that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Branch to operate on; the remote default branch when absent.
    pub branch: Option<String>,
    /// Path prefix applied to every operation.
    pub prefix: Option<String>,
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub repository: RepositoryConfig,
    /// Resolved from the [auth] section.
    pub credentials: Credentials,
    /// Resolved from the [committer] section, with bot defaults.
    pub committer: Committer,
}

impl Config {
    /// The repository coordinate this config points at.
    pub fn coordinate(&self) -> RepoCoordinate {
        let mut coordinate =
            RepoCoordinate::new(self.repository.owner.clone(), self.repository.name.clone());
        if let Some(branch) = &self.repository.branch {
            coordinate = coordinate.with_branch(branch.clone());
        }
        coordinate
    }

    /// The configured path prefix, or empty.
    pub fn prefix(&self) -> &str {
        self.repository.prefix.as_deref().unwrap_or("")
    }
}
