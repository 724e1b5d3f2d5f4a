//! GitHub-backed implementation of `ContentGateway`.

use base64::Engine;
use percent_encoding::{percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::committer::Committer;
use super::content_gateway::{ContentGateway, GatewayError, Result};
use super::credentials::Credentials;
use super::models::{CommitRecord, RateLimitStatus, RemoteEntry, RepoCoordinate};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Configuration for [`GithubGateway`].
pub struct GithubGatewayConfig {
    /// The repository every call operates on.
    pub coordinate: RepoCoordinate,
    /// Credentials resolved into the client at construction.
    pub credentials: Credentials,
    /// Optional API base URL override (for test servers).
    pub base_url: Option<String>,
}

impl GithubGatewayConfig {
    /// Create a config with anonymous credentials.
    pub fn new(coordinate: RepoCoordinate) -> Self {
        Self {
            coordinate,
            credentials: Credentials::Anonymous,
            base_url: None,
        }
    }

    /// Set the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set a custom API base URL (for test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// A `ContentGateway` talking to the GitHub REST API.
///
/// Authentication is applied exactly once, at construction, as default
/// request headers. Every mutating call produces one commit on the remote.
pub struct GithubGateway {
    client: Client,
    base_url: String,
    coordinate: RepoCoordinate,
}

impl GithubGateway {
    /// Build a gateway from the given configuration.
    ///
    /// Fails if the credentials cannot be expressed as a header or the
    /// underlying client cannot be constructed.
    pub fn new(config: GithubGatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("hubfs-rs/", env!("CARGO_PKG_VERSION"))),
        );
        config.credentials.apply(&mut headers)?;

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            coordinate: config.coordinate,
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            self.coordinate.owner,
            self.coordinate.repo,
            escape_path(path)
        )
    }

    /// Contents URL with the branch pinned via `?ref=` when configured.
    fn contents_read_url(&self, path: &str) -> String {
        let url = self.contents_url(path);
        match &self.coordinate.branch {
            Some(branch) => format!("{}?ref={}", url, encode_uri_component(branch)),
            None => url,
        }
    }

    fn commits_url(&self, path: &str) -> String {
        let mut url = format!(
            "{}/repos/{}/{}/commits?path={}",
            self.base_url,
            self.coordinate.owner,
            self.coordinate.repo,
            encode_uri_component(path)
        );
        if let Some(branch) = &self.coordinate.branch {
            url.push_str("&sha=");
            url.push_str(&encode_uri_component(branch));
        }
        url
    }

    fn rate_limit_url(&self) -> String {
        format!("{}/rate_limit", self.base_url)
    }

    fn branch(&self) -> Option<&str> {
        self.coordinate.branch.as_deref()
    }
}

/// Request body for content creation and update.
#[derive(Serialize)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    committer: &'a Committer,
}

/// Request body for content deletion.
#[derive(Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    committer: &'a Committer,
}

/// Error bodies carry a human-readable message field.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pull the remote's error message out of a failed response, best effort.
async fn error_message(response: Response) -> String {
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => String::new(),
    }
}

/// Map a mutation response: success statuses pass, 404 is not-found,
/// 409/422 are the remote's conflict signals (existing path on create,
/// stale sha on update/delete).
async fn check_mutation_response(response: Response) -> Result<()> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED => Ok(()),
        StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            Err(GatewayError::Conflict(error_message(response).await))
        }
        status => Err(GatewayError::Unexpected {
            status: status.as_u16(),
            message: error_message(response).await,
        }),
    }
}

fn encode_uri_component(s: &str) -> String {
    percent_encode(s.as_bytes(), NON_ALPHANUMERIC).to_string()
}

/// Percent-encode a repository path, preserving segment separators.
fn escape_path(path: &str) -> String {
    path.split('/')
        .map(encode_uri_component)
        .collect::<Vec<_>>()
        .join("/")
}

impl ContentGateway for GithubGateway {
    async fn exists(&self, path: &str) -> Result<bool> {
        tracing::debug!(path, "HEAD contents");
        let response = self.client.head(self.contents_read_url(path)).send().await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                message: String::new(),
            }),
        }
    }

    async fn show(&self, path: &str) -> Result<RemoteEntry> {
        tracing::debug!(path, "GET contents");
        let response = self.client.get(self.contents_read_url(path)).send().await?;

        match response.status() {
            StatusCode::OK => response
                .json::<RemoteEntry>()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
        }
    }

    async fn create(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        committer: &Committer,
    ) -> Result<()> {
        tracing::debug!(path, "PUT contents (create)");
        let body = WriteRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            sha: None,
            branch: self.branch(),
            committer,
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .json(&body)
            .send()
            .await?;

        check_mutation_response(response).await
    }

    async fn update(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        prior_sha: &str,
        committer: &Committer,
    ) -> Result<()> {
        tracing::debug!(path, prior_sha, "PUT contents (update)");
        let body = WriteRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            sha: Some(prior_sha),
            branch: self.branch(),
            committer,
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .json(&body)
            .send()
            .await?;

        check_mutation_response(response).await
    }

    async fn delete(
        &self,
        path: &str,
        message: &str,
        prior_sha: &str,
        committer: &Committer,
    ) -> Result<()> {
        tracing::debug!(path, prior_sha, "DELETE contents");
        let body = DeleteRequest {
            message,
            sha: prior_sha,
            branch: self.branch(),
            committer,
        };

        let response = self
            .client
            .delete(self.contents_url(path))
            .json(&body)
            .send()
            .await?;

        check_mutation_response(response).await
    }

    async fn list_commits(&self, path: &str) -> Result<Vec<CommitRecord>> {
        tracing::debug!(path, "GET commits");
        let response = self.client.get(self.commits_url(path)).send().await?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<CommitRecord>>()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
        }
    }

    async fn rate_limit(&self) -> Result<RateLimitStatus> {
        tracing::debug!("GET rate_limit");
        let response = self.client.get(self.rate_limit_url()).send().await?;

        match response.status() {
            StatusCode::OK => response
                .json::<RateLimitStatus>()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string())),
            status => Err(GatewayError::Unexpected {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(branch: Option<&str>) -> GithubGateway {
        let mut coordinate = RepoCoordinate::new("atomicptr", "demo-storage");
        if let Some(branch) = branch {
            coordinate = coordinate.with_branch(branch);
        }
        GithubGateway::new(GithubGatewayConfig::new(coordinate)).unwrap()
    }

    #[test]
    fn test_contents_url() {
        let gw = gateway(None);
        assert_eq!(
            gw.contents_url("src/main.rs"),
            "https://api.github.com/repos/atomicptr/demo-storage/contents/src/main%2Ers"
        );
    }

    #[test]
    fn test_contents_read_url_pins_branch() {
        let gw = gateway(Some("master"));
        assert_eq!(
            gw.contents_read_url("README.md"),
            "https://api.github.com/repos/atomicptr/demo-storage/contents/README%2Emd?ref=master"
        );
    }

    #[test]
    fn test_commits_url() {
        let gw = gateway(Some("main"));
        assert_eq!(
            gw.commits_url("docs/guide.md"),
            "https://api.github.com/repos/atomicptr/demo-storage/commits?path=docs%2Fguide%2Emd&sha=main"
        );
    }

    #[test]
    fn test_escape_path_preserves_separators() {
        assert_eq!(escape_path("a b/c#d"), "a%20b/c%23d");
    }
}
