//! Commit identity attached to every mutating call.

use serde::Serialize;

/// Name and email recorded as the committer on every commit this crate
/// creates. Reads never use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

impl Committer {
    /// Create a committer identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Committer {
    /// The conventional bot identity for automated commits.
    fn default() -> Self {
        Self::new(
            "github-actions[bot]",
            "github-actions[bot]@users.noreply.github.com",
        )
    }
}
