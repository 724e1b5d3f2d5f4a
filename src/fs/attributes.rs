//! Attribute value objects produced by listing and metadata operations.

use serde::Serialize;

/// Metadata for a file entry.
///
/// Fields not requested by the producing operation stay `None`; `visibility`
/// is always `None` because the storage model has no such concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    pub path: String,
    pub size: Option<u64>,
    pub visibility: Option<String>,
    /// Committer timestamp of the newest commit touching the path, epoch seconds.
    pub last_modified: Option<i64>,
    pub mime_type: Option<String>,
}

impl FileAttributes {
    /// Attributes carrying only the path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: None,
            visibility: None,
            last_modified: None,
            mime_type: None,
        }
    }
}

/// Metadata for a directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryAttributes {
    pub path: String,
}

impl DirectoryAttributes {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// An entry yielded by a contents listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageEntry {
    File(FileAttributes),
    #[serde(rename = "dir")]
    Directory(DirectoryAttributes),
}

impl StorageEntry {
    /// The path of this entry.
    pub fn path(&self) -> &str {
        match self {
            StorageEntry::File(f) => &f.path,
            StorageEntry::Directory(d) => &d.path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, StorageEntry::Directory(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, StorageEntry::File(_))
    }
}
