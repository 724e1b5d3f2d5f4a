//! hubfs-rs - filesystem-style access to a hosted repository's contents.
//!
//! Maps files, directories, moves and copies onto a commit-based content
//! API: every mutation is one remote commit, directories exist only through
//! the blobs beneath them, and the remote repository is the sole source of
//! truth.

pub mod cli;
pub mod config;
pub mod fs;
pub mod gateway;

pub use fs::{
    ContentsList, DirectoryAttributes, FileAttributes, FsError, PublicUrlCdn, RepoFs, StorageEntry,
};

pub use gateway::{
    Committer, ContentGateway, Credentials, GatewayError, GithubGateway, GithubGatewayConfig,
    MemoryGateway, RepoCoordinate,
};
