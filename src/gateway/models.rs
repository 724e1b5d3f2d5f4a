//! Wire models for the repository content API.

use std::collections::BTreeMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Blob sha is the content hash the remote hands out with every blob and
/// requires back as the optimistic-concurrency token on update and delete.
pub type BlobSha = String;

/// Identifies the repository every call operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinate {
    /// Account that owns the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch to operate on. `None` means the remote's default branch.
    pub branch: Option<String>,
}

impl RepoCoordinate {
    /// Create a coordinate targeting the remote's default branch.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: None,
        }
    }

    /// Pin the coordinate to a specific branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// The two shapes the "show path" endpoint can answer with.
///
/// The same endpoint returns a single object for a file and an array of
/// entries for a directory; callers discriminate by structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RemoteEntry {
    /// The path denotes a directory: one level of child entries.
    Listing(Vec<EntryRecord>),
    /// The path denotes a single file.
    Blob(BlobRecord),
}

/// A single file as returned by the content endpoint, payload included.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobRecord {
    pub name: String,
    pub path: String,
    pub sha: BlobSha,
    pub size: u64,
    pub encoding: String,
    pub content: String,
}

/// Error decoding a blob's payload.
#[derive(Debug, Error)]
pub enum ContentDecodeError {
    #[error("unknown content encoding: {0}")]
    UnknownEncoding(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl BlobRecord {
    /// Decode the payload according to its declared encoding.
    ///
    /// Only base64 is recognized; the remote wraps payloads at 60 columns,
    /// so whitespace is stripped before decoding.
    pub fn decoded_content(&self) -> Result<Vec<u8>, ContentDecodeError> {
        if self.encoding != "base64" {
            return Err(ContentDecodeError::UnknownEncoding(self.encoding.clone()));
        }

        let stripped: String = self
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        Ok(base64::engine::general_purpose::STANDARD.decode(stripped)?)
    }
}

/// Kind of a child entry in a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// A child entry in a directory listing. No payload; fetching content takes
/// a separate "show" on the entry's path.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRecord {
    pub name: String,
    pub path: String,
    pub sha: BlobSha,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl EntryRecord {
    /// Whether this entry is a directory. Symlinks and submodules are
    /// treated as files, matching the remote's own content model.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// One commit from the commit-history endpoint, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub commit: CommitDetail,
}

/// The commit body carried inside a [`CommitRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub committer: CommitSignature,
}

/// Who committed, and when.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

/// Rate limit standing for the authenticated (or anonymous) caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub resources: BTreeMap<String, RateLimitResource>,
}

/// Rate limit counters for one resource class (core, search, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResource {
    pub limit: u64,
    pub used: u64,
    pub remaining: u64,
    /// Epoch seconds at which the window resets.
    pub reset: u64,
}
