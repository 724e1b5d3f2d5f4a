mod committer;
mod content_gateway;
mod credentials;
mod github_gateway;
mod memory_gateway;
mod models;

pub use committer::Committer;
pub use content_gateway::{ContentGateway, GatewayError, Result};
pub use credentials::Credentials;
pub use github_gateway::{GithubGateway, GithubGatewayConfig};
pub use memory_gateway::{MemoryGateway, MemoryGatewayBuilder};
pub use models::{
    BlobRecord, BlobSha, CommitDetail, CommitRecord, CommitSignature, ContentDecodeError,
    EntryKind, EntryRecord, RateLimitResource, RateLimitStatus, RemoteEntry, RepoCoordinate,
};
