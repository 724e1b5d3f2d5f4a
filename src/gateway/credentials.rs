//! Credential modes for the outbound client.

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use super::content_gateway::{GatewayError, Result};

/// How the client authenticates against the remote API.
///
/// Resolved exactly once, at gateway construction, into the transport's
/// default headers; never re-evaluated per call.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No credentials: read-only, heavily rate-limited access.
    Anonymous,
    /// A personal or installation access token.
    Token(String),
    /// A signed JWT assertion (app authentication).
    Jwt(String),
    /// OAuth application id and secret.
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

impl Credentials {
    /// Anonymous access.
    pub fn anonymous() -> Self {
        Credentials::Anonymous
    }

    /// Authenticate with an access token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Credentials::Token(token.into())
    }

    /// Authenticate with a signed JWT assertion.
    pub fn from_jwt(jwt: impl Into<String>) -> Self {
        Credentials::Jwt(jwt.into())
    }

    /// Authenticate with OAuth client credentials.
    pub fn from_client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Credentials::ClientCredentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Install this credential's `Authorization` header into the client's
    /// default headers. Anonymous mode installs nothing.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let value = match self {
            Credentials::Anonymous => return Ok(()),
            Credentials::Token(token) | Credentials::Jwt(token) => {
                format!("Bearer {}", token)
            }
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => {
                let pair = format!("{}:{}", client_id, client_secret);
                let encoded = base64::engine::general_purpose::STANDARD.encode(pair);
                format!("Basic {}", encoded)
            }
        };

        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| GatewayError::Other("credential is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_installs_nothing() {
        let mut headers = HeaderMap::new();
        Credentials::anonymous().apply(&mut headers).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_installs_bearer() {
        let mut headers = HeaderMap::new();
        Credentials::from_token("ghp_abc123")
            .apply(&mut headers)
            .unwrap();
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap(),
            &HeaderValue::from_static("Bearer ghp_abc123")
        );
    }

    #[test]
    fn test_client_credentials_install_basic() {
        let mut headers = HeaderMap::new();
        Credentials::from_client_credentials("id", "secret")
            .apply(&mut headers)
            .unwrap();
        // "id:secret" base64-encoded
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap(),
            &HeaderValue::from_static("Basic aWQ6c2VjcmV0")
        );
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        let mut headers = HeaderMap::new();
        let result = Credentials::from_token("bad\ntoken").apply(&mut headers);
        assert!(result.is_err());
    }
}
