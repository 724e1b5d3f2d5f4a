//! Error types for filesystem operations.

use thiserror::Error;

/// Boxed original cause carried by most variants, alongside the path.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Which piece of metadata a retrieval was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    MimeType,
    FileSize,
    LastModified,
}

impl std::fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataKind::MimeType => write!(f, "mime type"),
            MetadataKind::FileSize => write!(f, "file size"),
            MetadataKind::LastModified => write!(f, "last modified time"),
        }
    }
}

/// Error type for filesystem operations.
///
/// Every remote failure is caught at the operation boundary and rewrapped
/// into the variant naming that operation, carrying the path and the
/// original cause. Composite operations (move, copy, delete-directory) name
/// the composite, not the sub-step that failed.
#[derive(Debug, Error)]
pub enum FsError {
    /// Existence check failed.
    #[error("unable to check existence of {path}: {source}")]
    ExistenceCheck {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Read failed, including unknown-encoding and wrong-node-type cases.
    #[error("unable to read file at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Write failed, including create-conflict and stale-hash cases.
    #[error("unable to write file at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Delete failed.
    #[error("unable to delete file at {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Directory existence check failed.
    #[error("unable to check directory existence of {path}: {source}")]
    DirectoryExistenceCheck {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Directory creation failed.
    #[error("unable to create directory at {path}: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Recursive directory deletion failed, possibly partway through.
    #[error("unable to delete directory at {path}: {source}")]
    DeleteDirectory {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Listing failed, including the path-is-a-file case.
    #[error("unable to list contents of {path}: {source}")]
    Listing {
        path: String,
        #[source]
        source: BoxedCause,
    },

    /// Move failed; the copy may have completed before the delete failed.
    #[error("unable to move {from} to {to}: {source}")]
    Move {
        from: String,
        to: String,
        #[source]
        source: BoxedCause,
    },

    /// Copy failed.
    #[error("unable to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: BoxedCause,
    },

    /// Metadata retrieval failed.
    #[error("unable to retrieve {kind} for {path}: {source}")]
    Metadata {
        path: String,
        kind: MetadataKind,
        #[source]
        source: BoxedCause,
    },

    /// The storage model has no visibility concept; raised unconditionally.
    #[error("visibility is not supported by the repository content model")]
    VisibilityUnsupported,

    /// Bad configuration detected before any remote call.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FsError {
    pub(crate) fn existence_check(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::ExistenceCheck {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn read(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::Read {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn write(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::Write {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn delete(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::Delete {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn directory_existence_check(
        path: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        FsError::DirectoryExistenceCheck {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn create_directory(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::CreateDirectory {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn delete_directory(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::DeleteDirectory {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn listing(path: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        FsError::Listing {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn moving(
        from: impl Into<String>,
        to: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        FsError::Move {
            from: from.into(),
            to: to.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn copying(
        from: impl Into<String>,
        to: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        FsError::Copy {
            from: from.into(),
            to: to.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn metadata(
        path: impl Into<String>,
        kind: MetadataKind,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        FsError::Metadata {
            path: path.into(),
            kind,
            source: cause.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
