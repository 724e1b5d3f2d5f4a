mod attributes;
mod error;
mod listing;
mod mime_types;
mod path_prefixer;
mod public_url;
mod repo_fs;

pub use attributes::{DirectoryAttributes, FileAttributes, StorageEntry};
pub use error::{BoxedCause, FsError, MetadataKind, Result};
pub use listing::ContentsList;
pub use mime_types::mime_type_from_path;
pub use path_prefixer::PathPrefixer;
pub use public_url::{resolve_public_url, PublicUrlCdn};
pub use repo_fs::RepoFs;
