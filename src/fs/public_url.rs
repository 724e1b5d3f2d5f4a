//! Public URL resolution for repository content.

use crate::gateway::RepoCoordinate;

use super::error::{FsError, Result};

/// Which content delivery network a public URL should point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicUrlCdn {
    /// jsDelivr; works without a branch (serves the latest revision).
    #[default]
    JsDelivr,
    /// Raw repository content; requires an explicit branch.
    GithubRaw,
}

/// Map a prefixed path to a public URL. Pure string formatting; the
/// produced URL is not validated against the network.
pub fn resolve_public_url(
    coordinate: &RepoCoordinate,
    path: &str,
    cdn: PublicUrlCdn,
) -> Result<String> {
    match cdn {
        PublicUrlCdn::JsDelivr => {
            let branch = coordinate
                .branch
                .as_deref()
                .map(|b| format!("@{}", b))
                .unwrap_or_default();

            Ok(format!(
                "https://cdn.jsdelivr.net/gh/{}/{}{}/{}",
                coordinate.owner, coordinate.repo, branch, path
            ))
        }
        PublicUrlCdn::GithubRaw => {
            let Some(branch) = coordinate.branch.as_deref() else {
                return Err(FsError::Configuration(
                    "raw content URLs require a configured branch".to_string(),
                ));
            };

            Ok(format!(
                "https://raw.githubusercontent.com/{}/{}/{}/{}",
                coordinate.owner, coordinate.repo, branch, path
            ))
        }
    }
}
