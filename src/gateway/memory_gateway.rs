//! An in-memory implementation of `ContentGateway`, intended primarily for
//! testing the filesystem layer without a network.

use std::collections::BTreeMap;
use std::sync::RwLock;

use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};

use super::committer::Committer;
use super::content_gateway::{ContentGateway, GatewayError, Result};
use super::models::{
    BlobRecord, BlobSha, CommitDetail, CommitRecord, CommitSignature, EntryKind, EntryRecord,
    RateLimitResource, RateLimitStatus, RemoteEntry,
};

/// Synthetic epoch the commit clock counts up from.
const CLOCK_EPOCH: i64 = 1_700_000_000;

#[derive(Debug, Clone)]
struct StoredBlob {
    content: Vec<u8>,
    sha: BlobSha,
}

#[derive(Debug, Clone)]
struct StoredCommit {
    path: String,
    sha: String,
    message: String,
    committer: Committer,
    date: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    blobs: BTreeMap<String, StoredBlob>,
    /// Commit log, oldest first.
    commits: Vec<StoredCommit>,
    /// Ticks once per commit so timestamps are distinct and ordered.
    clock: i64,
    /// Message for a one-shot injected failure on the next call.
    fail_next: Option<String>,
}

impl MemoryState {
    fn record_commit(&mut self, path: &str, message: &str, committer: &Committer) {
        self.clock += 1;
        let date = Utc
            .timestamp_opt(CLOCK_EPOCH + self.clock, 0)
            .single()
            .unwrap_or_else(Utc::now);
        self.commits.push(StoredCommit {
            path: path.to_string(),
            sha: content_sha(format!("{}:{}", self.clock, path).as_bytes()),
            message: message.to_string(),
            committer: committer.clone(),
            date,
        });
    }

    fn take_fault(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(message) => Err(GatewayError::Other(message)),
            None => Ok(()),
        }
    }

    /// Whether any blob lives under `path/`.
    fn has_children(&self, path: &str) -> bool {
        if path.is_empty() {
            return !self.blobs.is_empty();
        }
        let prefix = format!("{}/", path);
        self.blobs.keys().any(|k| k.starts_with(&prefix))
    }
}

fn content_sha(content: &[u8]) -> BlobSha {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// An in-memory `ContentGateway`.
///
/// Mimics the remote contract the filesystem layer depends on: create
/// conflicts on an existing path, update/delete verify the prior content
/// hash, show answers with a blob or a one-level listing, directories exist
/// only implicitly through the blobs beneath them, and every mutation lands
/// in a commit log queried newest-first.
pub struct MemoryGateway {
    state: RwLock<MemoryState>,
}

impl MemoryGateway {
    /// Create a new empty in-memory gateway.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Create a builder for pre-seeding content.
    pub fn builder() -> MemoryGatewayBuilder {
        MemoryGatewayBuilder {
            entries: Vec::new(),
        }
    }

    /// Make the next gateway call fail with `GatewayError::Other(message)`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.write().unwrap().fail_next = Some(message.into());
    }

    /// Number of commits recorded so far.
    pub fn commit_count(&self) -> usize {
        self.state.read().unwrap().commits.len()
    }

    /// The most recent commit's message, if any commit exists.
    pub fn last_commit_message(&self) -> Option<String> {
        let state = self.state.read().unwrap();
        state.commits.last().map(|c| c.message.clone())
    }

    /// The most recent commit's committer identity, if any commit exists.
    pub fn last_committer(&self) -> Option<Committer> {
        let state = self.state.read().unwrap();
        state.commits.last().map(|c| c.committer.clone())
    }

    fn list_children(state: &MemoryState, path: &str) -> Vec<EntryRecord> {
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };

        let mut entries: BTreeMap<String, EntryRecord> = BTreeMap::new();
        for (key, blob) in &state.blobs {
            let Some(remainder) = key.strip_prefix(&prefix) else {
                continue;
            };
            if remainder.is_empty() {
                continue;
            }

            match remainder.split_once('/') {
                Some((dir_name, _)) => {
                    let dir_path = format!("{}{}", prefix, dir_name);
                    entries.entry(dir_name.to_string()).or_insert(EntryRecord {
                        name: dir_name.to_string(),
                        path: dir_path.clone(),
                        sha: content_sha(dir_path.as_bytes()),
                        size: 0,
                        kind: EntryKind::Dir,
                    });
                }
                None => {
                    entries.insert(
                        remainder.to_string(),
                        EntryRecord {
                            name: remainder.to_string(),
                            path: key.clone(),
                            sha: blob.sha.clone(),
                            size: blob.content.len() as u64,
                            kind: EntryKind::File,
                        },
                    );
                }
            }
        }

        entries.into_values().collect()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder that seeds a [`MemoryGateway`] with initial content. Each seeded
/// file is recorded as its own commit, so commit history queries work on
/// seeded paths too.
pub struct MemoryGatewayBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl MemoryGatewayBuilder {
    /// Seed a file at `path` with the given content.
    pub fn add(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.entries.push((path.into(), content.into()));
        self
    }

    pub fn build(self) -> MemoryGateway {
        let gateway = MemoryGateway::new();
        {
            let mut state = gateway.state.write().unwrap();
            let committer = Committer::default();
            for (path, content) in self.entries {
                let path = normalize(&path).to_string();
                state.blobs.insert(
                    path.clone(),
                    StoredBlob {
                        sha: content_sha(&content),
                        content,
                    },
                );
                state.record_commit(&path, &format!("Created file: {}", path), &committer);
            }
        }
        gateway
    }
}

impl ContentGateway for MemoryGateway {
    async fn exists(&self, path: &str) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let path = normalize(path);
        Ok(state.blobs.contains_key(path) || state.has_children(path))
    }

    async fn show(&self, path: &str) -> Result<RemoteEntry> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let path = normalize(path);
        if let Some(blob) = state.blobs.get(path) {
            return Ok(RemoteEntry::Blob(BlobRecord {
                name: base_name(path).to_string(),
                path: path.to_string(),
                sha: blob.sha.clone(),
                size: blob.content.len() as u64,
                encoding: "base64".to_string(),
                content: base64::engine::general_purpose::STANDARD.encode(&blob.content),
            }));
        }

        if state.has_children(path) {
            return Ok(RemoteEntry::Listing(Self::list_children(&state, path)));
        }

        Err(GatewayError::NotFound)
    }

    async fn create(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        committer: &Committer,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let path = normalize(path).to_string();
        if state.blobs.contains_key(&path) || state.has_children(&path) {
            return Err(GatewayError::Conflict(format!(
                "path already exists: {}",
                path
            )));
        }

        state.blobs.insert(
            path.clone(),
            StoredBlob {
                sha: content_sha(content),
                content: content.to_vec(),
            },
        );
        state.record_commit(&path, message, committer);

        Ok(())
    }

    async fn update(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        prior_sha: &str,
        committer: &Committer,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let path = normalize(path).to_string();
        let blob = state.blobs.get(&path).ok_or(GatewayError::NotFound)?;
        if blob.sha != prior_sha {
            return Err(GatewayError::Conflict(format!(
                "sha {} does not match current blob",
                prior_sha
            )));
        }

        state.blobs.insert(
            path.clone(),
            StoredBlob {
                sha: content_sha(content),
                content: content.to_vec(),
            },
        );
        state.record_commit(&path, message, committer);

        Ok(())
    }

    async fn delete(
        &self,
        path: &str,
        message: &str,
        prior_sha: &str,
        committer: &Committer,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let path = normalize(path).to_string();
        let blob = state.blobs.get(&path).ok_or(GatewayError::NotFound)?;
        if blob.sha != prior_sha {
            return Err(GatewayError::Conflict(format!(
                "sha {} does not match current blob",
                prior_sha
            )));
        }

        state.blobs.remove(&path);
        state.record_commit(&path, message, committer);

        Ok(())
    }

    async fn list_commits(&self, path: &str) -> Result<Vec<CommitRecord>> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let path = normalize(path);
        let prefix = format!("{}/", path);
        let commits = state
            .commits
            .iter()
            .rev()
            .filter(|c| path.is_empty() || c.path == path || c.path.starts_with(&prefix))
            .map(|c| CommitRecord {
                sha: c.sha.clone(),
                commit: CommitDetail {
                    message: c.message.clone(),
                    committer: CommitSignature {
                        name: c.committer.name.clone(),
                        email: c.committer.email.clone(),
                        date: c.date,
                    },
                },
            })
            .collect();

        Ok(commits)
    }

    async fn rate_limit(&self) -> Result<RateLimitStatus> {
        let mut state = self.state.write().unwrap();
        state.take_fault()?;

        let mut resources = BTreeMap::new();
        resources.insert(
            "core".to_string(),
            RateLimitResource {
                limit: 5000,
                used: state.commits.len() as u64,
                remaining: 5000 - (state.commits.len() as u64).min(5000),
                reset: (CLOCK_EPOCH + state.clock + 3600) as u64,
            },
        );

        Ok(RateLimitStatus { resources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_show_blob() {
        let gateway = MemoryGateway::new();
        let committer = Committer::default();

        gateway
            .create("docs/readme.md", b"hello", "Created file: docs/readme.md", &committer)
            .await
            .unwrap();

        match gateway.show("docs/readme.md").await.unwrap() {
            RemoteEntry::Blob(blob) => {
                assert_eq!(blob.size, 5);
                assert_eq!(blob.decoded_content().unwrap(), b"hello");
            }
            RemoteEntry::Listing(_) => panic!("expected blob"),
        }
    }

    #[tokio::test]
    async fn test_create_conflicts_on_existing_path() {
        let gateway = MemoryGateway::builder().add("a.txt", "one").build();
        let committer = Committer::default();

        let result = gateway.create("a.txt", b"two", "msg", &committer).await;
        assert!(matches!(result, Err(GatewayError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_requires_current_sha() {
        let gateway = MemoryGateway::builder().add("a.txt", "one").build();
        let committer = Committer::default();

        let result = gateway
            .update("a.txt", b"two", "msg", "stale-sha", &committer)
            .await;
        assert!(matches!(result, Err(GatewayError::Conflict(_))));

        let RemoteEntry::Blob(blob) = gateway.show("a.txt").await.unwrap() else {
            panic!("expected blob");
        };
        gateway
            .update("a.txt", b"two", "msg", &blob.sha, &committer)
            .await
            .unwrap();

        let RemoteEntry::Blob(blob) = gateway.show("a.txt").await.unwrap() else {
            panic!("expected blob");
        };
        assert_eq!(blob.decoded_content().unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_delete_requires_current_sha() {
        let gateway = MemoryGateway::builder().add("a.txt", "one").build();
        let committer = Committer::default();

        let result = gateway.delete("a.txt", "msg", "stale", &committer).await;
        assert!(matches!(result, Err(GatewayError::Conflict(_))));

        let RemoteEntry::Blob(blob) = gateway.show("a.txt").await.unwrap() else {
            panic!("expected blob");
        };
        gateway.delete("a.txt", "msg", &blob.sha, &committer).await.unwrap();
        assert!(matches!(
            gateway.show("a.txt").await,
            Err(GatewayError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_show_lists_one_level_with_implicit_directories() {
        let gateway = MemoryGateway::builder()
            .add("src/main.rs", "fn main() {}")
            .add("src/lib/mod.rs", "")
            .add("README.md", "# hi")
            .build();

        let RemoteEntry::Listing(entries) = gateway.show("src").await.unwrap() else {
            panic!("expected listing");
        };
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["lib", "main.rs"]);
        assert!(entries[0].is_dir());
        assert!(!entries[1].is_dir());
        assert_eq!(entries[1].path, "src/main.rs");
    }

    #[tokio::test]
    async fn test_directory_disappears_with_last_blob() {
        let gateway = MemoryGateway::builder().add("dir/only.txt", "x").build();
        let committer = Committer::default();

        assert!(gateway.exists("dir").await.unwrap());

        let RemoteEntry::Blob(blob) = gateway.show("dir/only.txt").await.unwrap() else {
            panic!("expected blob");
        };
        gateway
            .delete("dir/only.txt", "msg", &blob.sha, &committer)
            .await
            .unwrap();

        assert!(!gateway.exists("dir").await.unwrap());
        assert!(matches!(
            gateway.show("dir").await,
            Err(GatewayError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_commits_newest_first() {
        let gateway = MemoryGateway::new();
        let committer = Committer::default();

        gateway.create("a.txt", b"1", "first", &committer).await.unwrap();
        let RemoteEntry::Blob(blob) = gateway.show("a.txt").await.unwrap() else {
            panic!("expected blob");
        };
        gateway
            .update("a.txt", b"2", "second", &blob.sha, &committer)
            .await
            .unwrap();

        let commits = gateway.list_commits("a.txt").await.unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].commit.message, "second");
        assert!(commits[0].commit.committer.date > commits[1].commit.committer.date);
    }

    #[tokio::test]
    async fn test_list_commits_covers_directory_paths() {
        let gateway = MemoryGateway::builder()
            .add("docs/a.md", "a")
            .add("other.md", "o")
            .build();

        let commits = gateway.list_commits("docs").await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].commit.message, "Created file: docs/a.md");
    }

    #[tokio::test]
    async fn test_fail_next_fails_exactly_once() {
        let gateway = MemoryGateway::builder().add("a.txt", "x").build();

        gateway.fail_next("injected");
        assert!(gateway.exists("a.txt").await.is_err());
        assert!(gateway.exists("a.txt").await.unwrap());
    }
}
