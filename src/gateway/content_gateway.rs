//! The content gateway trait and its error type.

use std::future::Future;

use super::committer::Committer;
use super::models::{CommitRecord, RateLimitStatus, RemoteEntry};

/// Error type for gateway operations.
#[derive(Debug)]
pub enum GatewayError {
    /// The path was not found on the remote.
    NotFound,
    /// The remote rejected a mutation: the path already exists on create,
    /// or the supplied blob sha is stale on update/delete.
    Conflict(String),
    /// An HTTP transport failure.
    Http(reqwest::Error),
    /// The response body did not match the expected shape.
    Decode(String),
    /// The remote answered with a status this client does not expect.
    Unexpected { status: u16, message: String },
    /// A custom error message.
    Other(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::NotFound => write!(f, "not found"),
            GatewayError::Conflict(msg) => write!(f, "conflict: {}", msg),
            GatewayError::Http(e) => write!(f, "http error: {}", e),
            GatewayError::Decode(msg) => write!(f, "malformed response: {}", msg),
            GatewayError::Unexpected { status, message } => {
                write!(f, "unexpected status code {}: {}", status, message)
            }
            GatewayError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Http(e)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Typed access to the remote repository's content and commit endpoints.
///
/// All operations are asynchronous, stateless round trips against a single
/// (owner, repo, branch) coordinate fixed at construction. Implementations
/// perform no retries; transient failures propagate to the caller as-is.
pub trait ContentGateway: Send + Sync {
    /// Check whether a blob or directory exists at `path`.
    fn exists(&self, path: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Fetch the entry at `path`: a blob record for a file, one level of
    /// child entries for a directory.
    ///
    /// Returns `GatewayError::NotFound` if the path does not exist.
    fn show(&self, path: &str) -> impl Future<Output = Result<RemoteEntry>> + Send;

    /// Create a new blob at `path` as one commit.
    ///
    /// Returns `GatewayError::Conflict` if the path already exists.
    fn create(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        committer: &Committer,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Replace the blob at `path` as one commit.
    ///
    /// `prior_sha` must be the blob's current content hash, obtained via a
    /// preceding [`show`](Self::show); the remote rejects stale hashes with
    /// `GatewayError::Conflict`.
    fn update(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        prior_sha: &str,
        committer: &Committer,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete the blob at `path` as one commit. Same hash precondition as
    /// [`update`](Self::update).
    fn delete(
        &self,
        path: &str,
        message: &str,
        prior_sha: &str,
        committer: &Committer,
    ) -> impl Future<Output = Result<()>> + Send;

    /// List the commits touching `path`, newest first.
    fn list_commits(&self, path: &str) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send;

    /// Current rate limit standing for this client's credentials.
    fn rate_limit(&self) -> impl Future<Output = Result<RateLimitStatus>> + Send;
}
