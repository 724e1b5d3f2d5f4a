//! Lazy walker over directory contents.

use crate::gateway::{ContentGateway, EntryRecord};

use super::attributes::{DirectoryAttributes, StorageEntry};
use super::error::{FsError, Result};
use super::repo_fs::RepoFs;

/// A pull-based sequence of listing entries.
///
/// Entries come back in the order the remote reports them (not necessarily
/// sorted). In deep mode a directory's subtree is spliced in directly after
/// the directory itself, before its next sibling. Each file entry costs two
/// extra remote round trips (size, last-modified), so walking an N-entry
/// tree issues on the order of 2N+1 calls.
pub struct ContentsList<'a, G: ContentGateway> {
    fs: &'a RepoFs<G>,
    /// Prefixed path of the listing root, used for error wrapping.
    root: String,
    deep: bool,
    /// One iterator per directory level currently being walked.
    stack: Vec<std::vec::IntoIter<EntryRecord>>,
}

impl<'a, G: ContentGateway> ContentsList<'a, G> {
    pub(crate) fn new(
        fs: &'a RepoFs<G>,
        root: String,
        deep: bool,
        entries: Vec<EntryRecord>,
    ) -> Self {
        Self {
            fs,
            root,
            deep,
            stack: vec![entries.into_iter()],
        }
    }

    /// The next entry in the walk, or `None` once exhausted.
    pub async fn next(&mut self) -> Result<Option<StorageEntry>> {
        loop {
            let Some(level) = self.stack.last_mut() else {
                return Ok(None);
            };

            let Some(entry) = level.next() else {
                self.stack.pop();
                continue;
            };

            if entry.is_dir() {
                if self.deep {
                    let children = self
                        .fs
                        .list_level(&entry.path)
                        .await
                        .map_err(|e| FsError::listing(&self.root, e))?;
                    self.stack.push(children.into_iter());
                }
                return Ok(Some(StorageEntry::Directory(DirectoryAttributes::new(
                    entry.path,
                ))));
            }

            let attributes = self
                .fs
                .file_attributes_for(&entry)
                .await
                .map_err(|e| FsError::listing(&self.root, e))?;
            return Ok(Some(StorageEntry::File(attributes)));
        }
    }

    /// Drain the remaining entries into a vector.
    pub async fn collect(mut self) -> Result<Vec<StorageEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next().await? {
            entries.push(entry);
        }
        Ok(entries)
    }
}
