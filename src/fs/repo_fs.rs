//! The filesystem adapter over a remote repository's content endpoints.

use std::future::Future;
use std::pin::Pin;

use crate::gateway::{
    Committer, ContentGateway, EntryRecord, GatewayError, RateLimitStatus, RemoteEntry,
    RepoCoordinate,
};

use super::attributes::FileAttributes;
use super::error::{FsError, MetadataKind, Result};
use super::listing::ContentsList;
use super::mime_types::mime_type_from_path;
use super::path_prefixer::PathPrefixer;
use super::public_url::{resolve_public_url, PublicUrlCdn};

/// Placeholder blob written to materialize an otherwise-empty directory.
const DIRECTORY_PLACEHOLDER: &str = ".gitkeep";

/// Filesystem-style operations over a remote repository.
///
/// Stateless between calls: every operation recomputes what it needs from
/// the remote source of truth, and every mutation lands as exactly one
/// commit. Concurrent writers are not coordinated here; the remote's
/// content-hash precondition on update/delete turns a lost race into a
/// reported conflict instead of a silent overwrite.
pub struct RepoFs<G> {
    coordinate: RepoCoordinate,
    gateway: G,
    committer: Committer,
    prefixer: PathPrefixer,
}

impl<G: ContentGateway> RepoFs<G> {
    /// Create an adapter over the given gateway with the default committer
    /// identity and no path prefix.
    pub fn new(coordinate: RepoCoordinate, gateway: G) -> Self {
        Self {
            coordinate,
            gateway,
            committer: Committer::default(),
            prefixer: PathPrefixer::new(""),
        }
    }

    /// Use a specific committer identity for mutating calls.
    pub fn with_committer(mut self, committer: Committer) -> Self {
        self.committer = committer;
        self
    }

    /// Root all paths under the given prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixer = PathPrefixer::new(prefix);
        self
    }

    /// The repository this adapter operates on.
    pub fn coordinate(&self) -> &RepoCoordinate {
        &self.coordinate
    }

    /// Whether a blob (or directory) exists at `path`.
    pub async fn file_exists(&self, path: &str) -> Result<bool> {
        let prefixed = self.prefixer.prefix_path(path);
        self.gateway
            .exists(&prefixed)
            .await
            .map_err(|e| FsError::existence_check(prefixed, e))
    }

    /// Read the blob at `path`, decoded from its declared encoding.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let prefixed = self.prefixer.prefix_path(path);
        self.read_prefixed(&prefixed).await
    }

    async fn read_prefixed(&self, prefixed: &str) -> Result<Vec<u8>> {
        let entry = self
            .gateway
            .show(prefixed)
            .await
            .map_err(|e| FsError::read(prefixed, e))?;

        match entry {
            RemoteEntry::Blob(blob) => blob
                .decoded_content()
                .map_err(|e| FsError::read(prefixed, e)),
            RemoteEntry::Listing(_) => Err(FsError::read(
                prefixed,
                "path resolves to a directory, not a file",
            )),
        }
    }

    /// Write `contents` to `path` as one commit: a create if the path is
    /// absent, otherwise an update against the blob's current hash.
    ///
    /// The existence probe and the mutation are separate round trips; a
    /// writer that loses the race in between gets a conflict error from the
    /// remote's hash precondition rather than silently clobbering.
    pub async fn write(&self, path: &str, contents: &[u8]) -> Result<()> {
        let prefixed = self.prefixer.prefix_path(path);
        self.write_prefixed(&prefixed, contents).await
    }

    async fn write_prefixed(&self, prefixed: &str, contents: &[u8]) -> Result<()> {
        let exists = self
            .gateway
            .exists(prefixed)
            .await
            .map_err(|e| FsError::write(prefixed, e))?;

        if !exists {
            let message = format!("Created file: {}", prefixed);
            return self
                .gateway
                .create(prefixed, contents, &message, &self.committer)
                .await
                .map_err(|e| FsError::write(prefixed, e));
        }

        let entry = self
            .gateway
            .show(prefixed)
            .await
            .map_err(|e| FsError::write(prefixed, e))?;
        let RemoteEntry::Blob(prior) = entry else {
            return Err(FsError::write(
                prefixed,
                "path resolves to a directory, not a file",
            ));
        };

        let message = format!("Updated file: {}", prefixed);
        self.gateway
            .update(prefixed, contents, &message, &prior.sha, &self.committer)
            .await
            .map_err(|e| FsError::write(prefixed, e))
    }

    /// Delete the blob at `path` as one commit.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let prefixed = self.prefixer.prefix_path(path);
        self.delete_prefixed(&prefixed).await
    }

    async fn delete_prefixed(&self, prefixed: &str) -> Result<()> {
        let entry = self
            .gateway
            .show(prefixed)
            .await
            .map_err(|e| FsError::delete(prefixed, e))?;
        let RemoteEntry::Blob(prior) = entry else {
            return Err(FsError::delete(
                prefixed,
                "path resolves to a directory, not a file",
            ));
        };

        let message = format!("Deleted file: {}", prefixed);
        self.gateway
            .delete(prefixed, &message, &prior.sha, &self.committer)
            .await
            .map_err(|e| FsError::delete(prefixed, e))
    }

    /// Whether `path` denotes a directory.
    ///
    /// A path is a directory iff showing it yields a non-empty listing;
    /// directories have no independent existence. Not-found is the expected
    /// false-case signal here, so it is answered rather than propagated.
    pub async fn directory_exists(&self, path: &str) -> Result<bool> {
        let prefixed = self.prefixer.prefix_path(path);

        match self.gateway.show(&prefixed).await {
            Ok(RemoteEntry::Listing(entries)) => Ok(!entries.is_empty()),
            Ok(RemoteEntry::Blob(_)) => Ok(false),
            Err(GatewayError::NotFound) => Ok(false),
            Err(e) => Err(FsError::directory_existence_check(prefixed, e)),
        }
    }

    /// Materialize a directory by writing an empty placeholder blob at
    /// `path/.gitkeep`.
    pub async fn create_directory(&self, path: &str) -> Result<()> {
        let prefixed = self.prefixer.prefix_path(path);
        let placeholder = if prefixed.is_empty() {
            DIRECTORY_PLACEHOLDER.to_string()
        } else {
            format!("{}/{}", prefixed, DIRECTORY_PLACEHOLDER)
        };

        self.write_prefixed(&placeholder, b"")
            .await
            .map_err(|e| FsError::create_directory(prefixed, e))
    }

    /// Recursively delete every blob under `path`, depth-first, one commit
    /// per blob. Not transactional: a failure midway leaves the blobs
    /// deleted so far gone and the rest in place.
    pub async fn delete_directory(&self, path: &str) -> Result<()> {
        let prefixed = self.prefixer.prefix_path(path);
        self.delete_directory_prefixed(&prefixed)
            .await
            .map_err(|e| FsError::delete_directory(prefixed, e))
    }

    fn delete_directory_prefixed<'a>(
        &'a self,
        prefixed: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let entries = self.list_level(prefixed).await?;

            for entry in entries {
                if entry.is_dir() {
                    self.delete_directory_prefixed(&entry.path).await?;
                } else {
                    self.delete_prefixed(&entry.path).await?;
                }
            }

            Ok(())
        })
    }

    /// List the contents of `path`.
    ///
    /// Returns a lazy sequence; with `deep` set, subtrees are expanded
    /// pre-order (a directory appears before its descendants). Paths in the
    /// produced attributes are remote paths, prefix included.
    pub async fn list_contents(&self, path: &str, deep: bool) -> Result<ContentsList<'_, G>> {
        let prefixed = self.prefixer.prefix_path(path);
        let entries = self.list_level(&prefixed).await?;
        Ok(ContentsList::new(self, prefixed, deep, entries))
    }

    /// Fetch one directory level, failing if the path is a file.
    pub(crate) async fn list_level(&self, prefixed: &str) -> Result<Vec<EntryRecord>> {
        let entry = self
            .gateway
            .show(prefixed)
            .await
            .map_err(|e| FsError::listing(prefixed, e))?;

        match entry {
            RemoteEntry::Listing(entries) => Ok(entries),
            RemoteEntry::Blob(_) => Err(FsError::listing(
                prefixed,
                "path resolves to a file, not a directory",
            )),
        }
    }

    /// Full attributes for a file entry. Size and last-modified each take
    /// their own remote round trip.
    pub(crate) async fn file_attributes_for(&self, entry: &EntryRecord) -> Result<FileAttributes> {
        let size = self.file_size_prefixed(&entry.path).await?;
        let last_modified = self.last_modified_prefixed(&entry.path).await?;

        Ok(FileAttributes {
            path: entry.path.clone(),
            size: Some(size),
            visibility: None,
            last_modified: Some(last_modified),
            mime_type: mime_type_from_path(&entry.path).map(String::from),
        })
    }

    /// Move the blob at `source` to `destination`: a copy followed by a
    /// delete of the source. Not atomic; if the delete fails the content
    /// exists at both paths.
    pub async fn move_file(&self, source: &str, destination: &str) -> Result<()> {
        self.copy_file(source, destination)
            .await
            .map_err(|e| FsError::moving(source, destination, e))?;
        self.delete(source)
            .await
            .map_err(|e| FsError::moving(source, destination, e))
    }

    /// Copy the blob at `source` to `destination`: a read followed by a
    /// write. Not atomic, and not verified beyond what the write performs.
    pub async fn copy_file(&self, source: &str, destination: &str) -> Result<()> {
        let contents = self
            .read(source)
            .await
            .map_err(|e| FsError::copying(source, destination, e))?;
        self.write(destination, &contents)
            .await
            .map_err(|e| FsError::copying(source, destination, e))
    }

    /// Mime type derived from the path's extension. Purely local; fails
    /// only for unrecognized extensions.
    pub fn mime_type(&self, path: &str) -> Result<FileAttributes> {
        let prefixed = self.prefixer.prefix_path(path);
        let Some(mime) = mime_type_from_path(&prefixed) else {
            return Err(FsError::metadata(
                path,
                MetadataKind::MimeType,
                "unrecognized file extension",
            ));
        };

        let mut attributes = FileAttributes::new(path);
        attributes.mime_type = Some(mime.to_string());
        Ok(attributes)
    }

    /// Last-modified time of `path`, taken from the newest commit touching
    /// it. Fails if the path has no commit history.
    pub async fn last_modified(&self, path: &str) -> Result<FileAttributes> {
        let prefixed = self.prefixer.prefix_path(path);
        let last_modified = self.last_modified_prefixed(&prefixed).await?;

        let mut attributes = FileAttributes::new(path);
        attributes.last_modified = Some(last_modified);
        attributes.mime_type = mime_type_from_path(path).map(String::from);
        Ok(attributes)
    }

    async fn last_modified_prefixed(&self, prefixed: &str) -> Result<i64> {
        let commits = self
            .gateway
            .list_commits(prefixed)
            .await
            .map_err(|e| FsError::metadata(prefixed, MetadataKind::LastModified, e))?;

        let newest = commits.first().ok_or_else(|| {
            FsError::metadata(
                prefixed,
                MetadataKind::LastModified,
                "path has no commit history",
            )
        })?;

        Ok(newest.commit.committer.date.timestamp())
    }

    /// Size of the blob at `path` as reported by the remote.
    pub async fn file_size(&self, path: &str) -> Result<FileAttributes> {
        let prefixed = self.prefixer.prefix_path(path);
        let size = self.file_size_prefixed(&prefixed).await?;

        let mut attributes = FileAttributes::new(path);
        attributes.size = Some(size);
        attributes.mime_type = mime_type_from_path(path).map(String::from);
        Ok(attributes)
    }

    async fn file_size_prefixed(&self, prefixed: &str) -> Result<u64> {
        let entry = self
            .gateway
            .show(prefixed)
            .await
            .map_err(|e| FsError::metadata(prefixed, MetadataKind::FileSize, e))?;

        match entry {
            RemoteEntry::Blob(blob) => Ok(blob.size),
            RemoteEntry::Listing(_) => Err(FsError::metadata(
                prefixed,
                MetadataKind::FileSize,
                "path resolves to a directory, not a file",
            )),
        }
    }

    /// The storage model has no visibility concept; always fails.
    pub fn set_visibility(&self, _path: &str, _visibility: &str) -> Result<()> {
        Err(FsError::VisibilityUnsupported)
    }

    /// The storage model has no visibility concept; always fails.
    pub fn visibility(&self, _path: &str) -> Result<FileAttributes> {
        Err(FsError::VisibilityUnsupported)
    }

    /// Public URL for `path` on the chosen CDN. Pure string mapping.
    pub fn public_url(&self, path: &str, cdn: PublicUrlCdn) -> Result<String> {
        let prefixed = self.prefixer.prefix_path(path);
        resolve_public_url(&self.coordinate, &prefixed, cdn)
    }

    /// Rate limit standing of this adapter's credentials, straight from the
    /// gateway.
    pub async fn rate_limits(&self) -> crate::gateway::Result<RateLimitStatus> {
        self.gateway.rate_limit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::StorageEntry;
    use crate::gateway::MemoryGateway;

    fn fs_over(gateway: MemoryGateway) -> RepoFs<MemoryGateway> {
        let coordinate = RepoCoordinate::new("atomicptr", "demo-storage").with_branch("master");
        RepoFs::new(coordinate, gateway)
    }

    fn readme_gateway() -> MemoryGateway {
        MemoryGateway::builder()
            .add("README.md", "# atomicptr.dev\n\nSome demo storage.\n")
            .add("src/app.html", "<html></html>")
            .build()
    }

    #[tokio::test]
    async fn test_file_exists() {
        let fs = fs_over(readme_gateway());

        assert!(fs.file_exists("README.md").await.unwrap());
        assert!(fs.file_exists("src/app.html").await.unwrap());
        assert!(!fs.file_exists("HITLIST.md").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_exists_wraps_transport_failures() {
        let fs = fs_over(readme_gateway());
        fs.gateway.fail_next("boom");

        let result = fs.file_exists("README.md").await;
        assert!(matches!(result, Err(FsError::ExistenceCheck { .. })));
    }

    #[tokio::test]
    async fn test_read_known_header() {
        let fs = fs_over(readme_gateway());

        let content = fs.read("README.md").await.unwrap();
        assert!(content.starts_with(b"# atomicptr.dev"));
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.read("secret/hitlist.exe").await;
        assert!(matches!(result, Err(FsError::Read { .. })));
    }

    #[tokio::test]
    async fn test_read_directory_path_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.read("src").await;
        assert!(matches!(result, Err(FsError::Read { .. })));
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let fs = fs_over(MemoryGateway::new());

        fs.write("notes/today.md", b"first").await.unwrap();
        assert_eq!(fs.read("notes/today.md").await.unwrap(), b"first");

        // Second write takes the update path: re-fetch hash, then replace.
        fs.write("notes/today.md", b"second").await.unwrap();
        assert_eq!(fs.read("notes/today.md").await.unwrap(), b"second");

        assert_eq!(fs.gateway.commit_count(), 2);
        assert_eq!(
            fs.gateway.last_commit_message().unwrap(),
            "Updated file: notes/today.md"
        );
    }

    #[tokio::test]
    async fn test_write_records_committer_identity() {
        let committer = Committer::new("deploy-bot", "deploy@example.com");
        let fs = fs_over(MemoryGateway::new()).with_committer(committer.clone());

        fs.write("a.txt", b"x").await.unwrap();
        assert_eq!(fs.gateway.last_committer().unwrap(), committer);
    }

    #[tokio::test]
    async fn test_delete() {
        let fs = fs_over(readme_gateway());

        fs.delete("README.md").await.unwrap();
        assert!(!fs.file_exists("README.md").await.unwrap());
        assert_eq!(
            fs.gateway.last_commit_message().unwrap(),
            "Deleted file: README.md"
        );
    }

    #[tokio::test]
    async fn test_delete_missing_file_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.delete("missing.txt").await;
        assert!(matches!(result, Err(FsError::Delete { .. })));
    }

    #[tokio::test]
    async fn test_directory_exists() {
        let fs = fs_over(readme_gateway());

        assert!(fs.directory_exists("src").await.unwrap());
        // A blob path is not a directory, and neither is a missing path.
        assert!(!fs.directory_exists("README.md").await.unwrap());
        assert!(!fs.directory_exists("no-such-dir").await.unwrap());
    }

    #[tokio::test]
    async fn test_directory_exists_propagates_other_failures() {
        let fs = fs_over(readme_gateway());
        fs.gateway.fail_next("boom");

        let result = fs.directory_exists("src").await;
        assert!(matches!(
            result,
            Err(FsError::DirectoryExistenceCheck { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_directory_materializes_placeholder() {
        let fs = fs_over(MemoryGateway::new());

        fs.create_directory("assets/icons").await.unwrap();

        assert!(fs.directory_exists("assets/icons").await.unwrap());
        assert!(fs.file_exists("assets/icons/.gitkeep").await.unwrap());
        assert_eq!(fs.read("assets/icons/.gitkeep").await.unwrap(), b"");
    }

    #[tokio::test]
    async fn test_delete_directory_recurses_depth_first() {
        let gateway = MemoryGateway::builder()
            .add("a/one.txt", "1")
            .add("a/b/two.txt", "2")
            .add("a/b/c/three.txt", "3")
            .add("keep.txt", "stays")
            .build();
        let fs = fs_over(gateway);

        fs.delete_directory("a").await.unwrap();

        assert!(!fs.directory_exists("a").await.unwrap());
        assert!(!fs.file_exists("a/one.txt").await.unwrap());
        assert!(!fs.file_exists("a/b/two.txt").await.unwrap());
        assert!(!fs.file_exists("a/b/c/three.txt").await.unwrap());
        assert!(fs.file_exists("keep.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_directory_on_missing_path_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.delete_directory("nope").await;
        assert!(matches!(result, Err(FsError::DeleteDirectory { .. })));
    }

    #[tokio::test]
    async fn test_list_contents_shallow() {
        let gateway = MemoryGateway::builder()
            .add("README.md", "# hi")
            .add("src/main.rs", "fn main() {}")
            .build();
        let fs = fs_over(gateway);

        let entries = fs.list_contents("", false).await.unwrap().collect().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_file());
        assert_eq!(entries[0].path(), "README.md");
        assert!(entries[1].is_dir());
        assert_eq!(entries[1].path(), "src");

        // Shallow listing does not descend.
        assert!(!entries.iter().any(|e| e.path() == "src/main.rs"));

        let StorageEntry::File(readme) = &entries[0] else {
            panic!("expected file");
        };
        assert_eq!(readme.size, Some(4));
        assert_eq!(readme.mime_type.as_deref(), Some("text/markdown"));
        assert!(readme.last_modified.is_some());
        assert!(readme.visibility.is_none());
    }

    #[tokio::test]
    async fn test_list_contents_deep_is_preorder_and_complete() {
        let gateway = MemoryGateway::builder()
            .add("README.md", "# hi")
            .add("src/main.rs", "fn main() {}")
            .add("src/lib/mod.rs", "pub mod x;")
            .build();
        let fs = fs_over(gateway);

        let entries = fs.list_contents("", true).await.unwrap().collect().await.unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path()).collect();

        assert_eq!(
            paths,
            vec![
                "README.md",
                "src",
                "src/lib",
                "src/lib/mod.rs",
                "src/main.rs",
            ]
        );

        // Every blob exactly once, each directory before its descendants.
        for (i, entry) in entries.iter().enumerate() {
            if entry.is_dir() {
                let subtree_prefix = format!("{}/", entry.path());
                for descendant in entries.iter().filter(|e| e.path().starts_with(&subtree_prefix)) {
                    let position = paths.iter().position(|p| *p == descendant.path()).unwrap();
                    assert!(position > i);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_list_contents_on_file_path_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.list_contents("README.md", false).await;
        assert!(matches!(result, Err(FsError::Listing { .. })));
    }

    #[tokio::test]
    async fn test_list_contents_on_missing_path_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.list_contents("missing", false).await;
        assert!(matches!(result, Err(FsError::Listing { .. })));
    }

    #[tokio::test]
    async fn test_move_file() {
        let fs = fs_over(readme_gateway());
        let original = fs.read("README.md").await.unwrap();

        fs.move_file("README.md", "docs/README.md").await.unwrap();

        assert!(!fs.file_exists("README.md").await.unwrap());
        assert!(fs.file_exists("docs/README.md").await.unwrap());
        assert_eq!(fs.read("docs/README.md").await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_move_missing_source_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.move_file("nope.txt", "dest.txt").await;
        assert!(matches!(result, Err(FsError::Move { .. })));
    }

    #[tokio::test]
    async fn test_copy_file_leaves_source_intact() {
        let fs = fs_over(readme_gateway());
        let original = fs.read("README.md").await.unwrap();

        fs.copy_file("README.md", "copy.md").await.unwrap();

        assert_eq!(fs.read("README.md").await.unwrap(), original);
        assert_eq!(fs.read("copy.md").await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_file_size_reports_blob_size() {
        let body = "x".repeat(52);
        let gateway = MemoryGateway::builder().add("src/main.rs", body).build();
        let fs = fs_over(gateway);

        let attributes = fs.file_size("src/main.rs").await.unwrap();
        assert_eq!(attributes.size, Some(52));
        assert_eq!(attributes.mime_type.as_deref(), Some("text/x-rust"));
    }

    #[tokio::test]
    async fn test_file_size_on_directory_fails() {
        let fs = fs_over(readme_gateway());

        let result = fs.file_size("src").await;
        assert!(matches!(
            result,
            Err(FsError::Metadata {
                kind: MetadataKind::FileSize,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_last_modified_tracks_newest_commit() {
        let fs = fs_over(MemoryGateway::new());

        fs.write("a.txt", b"1").await.unwrap();
        let first = fs.last_modified("a.txt").await.unwrap().last_modified.unwrap();

        fs.write("a.txt", b"2").await.unwrap();
        let second = fs.last_modified("a.txt").await.unwrap().last_modified.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_last_modified_without_history_fails() {
        let fs = fs_over(MemoryGateway::new());

        let result = fs.last_modified("never-written.txt").await;
        assert!(matches!(
            result,
            Err(FsError::Metadata {
                kind: MetadataKind::LastModified,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_mime_type_is_local() {
        let fs = fs_over(MemoryGateway::new());

        // No remote content required at all.
        let attributes = fs.mime_type("logo.svg").unwrap();
        assert_eq!(attributes.mime_type.as_deref(), Some("image/svg+xml"));
        assert_eq!(attributes.path, "logo.svg");

        let result = fs.mime_type("Makefile");
        assert!(matches!(
            result,
            Err(FsError::Metadata {
                kind: MetadataKind::MimeType,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_visibility_is_unsupported() {
        let fs = fs_over(readme_gateway());

        assert!(matches!(
            fs.set_visibility("README.md", "public"),
            Err(FsError::VisibilityUnsupported)
        ));
        assert!(matches!(
            fs.visibility("README.md"),
            Err(FsError::VisibilityUnsupported)
        ));
    }

    #[tokio::test]
    async fn test_public_url_jsdelivr() {
        let fs = fs_over(MemoryGateway::new());

        let url = fs.public_url("src/main.rs", PublicUrlCdn::JsDelivr).unwrap();
        assert_eq!(
            url,
            "https://cdn.jsdelivr.net/gh/atomicptr/demo-storage@master/src/main.rs"
        );
    }

    #[tokio::test]
    async fn test_public_url_raw_without_branch_is_a_configuration_error() {
        let coordinate = RepoCoordinate::new("atomicptr", "demo-storage");
        let fs = RepoFs::new(coordinate, MemoryGateway::new());

        let result = fs.public_url("src/main.rs", PublicUrlCdn::GithubRaw);
        assert!(matches!(result, Err(FsError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_prefix_is_applied_exactly_once() {
        let coordinate = RepoCoordinate::new("atomicptr", "demo-storage").with_branch("master");
        let fs = RepoFs::new(coordinate, MemoryGateway::new()).with_prefix("site/public");

        fs.write("css/app.css", b"body {}").await.unwrap();

        // The blob landed under the prefix, and commit messages use the
        // remote path.
        assert!(fs.file_exists("css/app.css").await.unwrap());
        assert_eq!(
            fs.gateway.last_commit_message().unwrap(),
            "Created file: site/public/css/app.css"
        );

        // Listing emits remote (prefixed) paths; composite operations keep
        // working on top of them.
        let entries = fs.list_contents("css", false).await.unwrap().collect().await.unwrap();
        assert_eq!(entries[0].path(), "site/public/css/app.css");

        fs.delete_directory("css").await.unwrap();
        assert!(!fs.directory_exists("css").await.unwrap());

        let url = fs.public_url("css/app.css", PublicUrlCdn::JsDelivr).unwrap();
        assert_eq!(
            url,
            "https://cdn.jsdelivr.net/gh/atomicptr/demo-storage@master/site/public/css/app.css"
        );
    }

    #[tokio::test]
    async fn test_create_then_delete_directory_round_trip() {
        let fs = fs_over(MemoryGateway::new());

        fs.create_directory("d").await.unwrap();
        fs.write("d/nested/file.txt", b"x").await.unwrap();
        assert!(fs.directory_exists("d").await.unwrap());

        fs.delete_directory("d").await.unwrap();
        assert!(!fs.directory_exists("d").await.unwrap());
    }

    #[tokio::test]
    async fn test_rate_limits_pass_through() {
        let fs = fs_over(MemoryGateway::new());

        let status = fs.rate_limits().await.unwrap();
        assert!(status.resources.contains_key("core"));
    }
}
