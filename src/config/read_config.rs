//! Configuration file reading and parsing.
//!
//! Handles locating, reading, and parsing the INI-format configuration file,
//! with support for key=value overrides applied on top.

use std::env;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use thiserror::Error;

use crate::gateway::{Committer, Credentials};

use super::types::{Config, RepositoryConfig};

const ENV_CONFIG_FILE: &str = "HUBFS_CONFIG_FILE";
const DEFAULT_CONFIG_FILENAME: &str = ".hubfsconfig";

const DEFAULT_COMMITTER_NAME: &str = "github-actions[bot]";
const DEFAULT_COMMITTER_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

/// Errors that can occur when reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("missing required field '{field}' in section '{section}'")]
    MissingRequiredField { section: String, field: String },

    #[error("unknown auth method '{0}' (expected anonymous, token, jwt or client-credentials)")]
    UnknownAuthMethod(String),

    #[error("auth method '{method}' requires field '{field}' in section 'auth'")]
    MissingAuthField { method: String, field: String },

    #[error("invalid override key '{0}' (expected section.key=value)")]
    InvalidOverrideKey(String),
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Specifies how to locate and layer configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Explicit config file path from the CLI. If specified and missing,
    /// error. If None, fall back to HUBFS_CONFIG_FILE, then ~/.hubfsconfig.
    pub config_file: Option<PathBuf>,

    /// Individual key=value overrides, keys in section.key dot-notation
    /// ("repository.owner", "auth.token"). Applied last.
    pub overrides: Vec<(String, String)>,
}

/// Resolve which config file to use based on the source and environment.
fn resolve_config_file(source: &ConfigSource) -> Result<Option<PathBuf>> {
    if let Some(path) = &source.config_file {
        if path.exists() {
            return Ok(Some(path.clone()));
        }
        return Err(ConfigError::FileNotFound(path.clone()));
    }

    if let Ok(env_path) = env::var(ENV_CONFIG_FILE) {
        let path = PathBuf::from(&env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(path));
    }

    if let Some(home) = home_dir() {
        let default_path = home.join(DEFAULT_CONFIG_FILENAME);
        if default_path.exists() {
            return Ok(Some(default_path));
        }
    }

    Ok(None)
}

/// Get the user's home directory.
fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// Read configuration: resolve the file, load it (if any), apply overrides,
/// and parse into a typed [`Config`].
pub fn read_config(source: &ConfigSource) -> Result<Config> {
    let mut ini = Ini::new();

    if let Some(path) = resolve_config_file(source)? {
        load_file(&mut ini, &path)?;
    }

    apply_overrides(&mut ini, &source.overrides)?;
    parse_config(&ini)
}

fn load_file(ini: &mut Ini, path: &Path) -> Result<()> {
    ini.load(path).map_err(|message| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(())
}

fn apply_overrides(ini: &mut Ini, overrides: &[(String, String)]) -> Result<()> {
    for (key, value) in overrides {
        let Some((section, field)) = key.split_once('.') else {
            return Err(ConfigError::InvalidOverrideKey(key.clone()));
        };
        if section.is_empty() || field.is_empty() {
            return Err(ConfigError::InvalidOverrideKey(key.clone()));
        }
        ini.set(section, field, Some(value.clone()));
    }
    Ok(())
}

fn required(ini: &Ini, section: &str, field: &str) -> Result<String> {
    ini.get(section, field)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingRequiredField {
            section: section.to_string(),
            field: field.to_string(),
        })
}

fn auth_field(ini: &Ini, method: &str, field: &str) -> Result<String> {
    ini.get("auth", field)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingAuthField {
            method: method.to_string(),
            field: field.to_string(),
        })
}

/// Parse credentials from the [auth] section. An unknown method fails fast
/// here, before any client is constructed.
fn parse_credentials(ini: &Ini) -> Result<Credentials> {
    let method = ini
        .get("auth", "method")
        .unwrap_or_else(|| "anonymous".to_string());

    match method.to_lowercase().as_str() {
        "anonymous" => Ok(Credentials::anonymous()),
        "token" => Ok(Credentials::from_token(auth_field(ini, "token", "token")?)),
        "jwt" => Ok(Credentials::from_jwt(auth_field(ini, "jwt", "token")?)),
        "client-credentials" => Ok(Credentials::from_client_credentials(
            auth_field(ini, "client-credentials", "client_id")?,
            auth_field(ini, "client-credentials", "client_secret")?,
        )),
        _ => Err(ConfigError::UnknownAuthMethod(method)),
    }
}

fn parse_committer(ini: &Ini) -> Committer {
    Committer::new(
        ini.get("committer", "name")
            .unwrap_or_else(|| DEFAULT_COMMITTER_NAME.to_string()),
        ini.get("committer", "email")
            .unwrap_or_else(|| DEFAULT_COMMITTER_EMAIL.to_string()),
    )
}

/// Parse a loaded Ini into a typed [`Config`].
fn parse_config(ini: &Ini) -> Result<Config> {
    let repository = RepositoryConfig {
        owner: required(ini, "repository", "owner")?,
        name: required(ini, "repository", "name")?,
        branch: ini.get("repository", "branch"),
        prefix: ini.get("repository", "prefix"),
    };

    Ok(Config {
        repository,
        credentials: parse_credentials(ini)?,
        committer: parse_committer(ini),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ini_from(content: &str) -> Ini {
        let mut ini = Ini::new();
        ini.read(content.to_string()).unwrap();
        ini
    }

    #[test]
    fn test_minimal_config() {
        let ini = ini_from(
            "[repository]\n\
             owner = atomicptr\n\
             name = demo-storage\n",
        );

        let config = parse_config(&ini).unwrap();
        assert_eq!(config.repository.owner, "atomicptr");
        assert_eq!(config.repository.name, "demo-storage");
        assert!(config.repository.branch.is_none());
        assert!(matches!(config.credentials, Credentials::Anonymous));
        assert_eq!(config.committer.name, DEFAULT_COMMITTER_NAME);

        let coordinate = config.coordinate();
        assert_eq!(coordinate.owner, "atomicptr");
        assert!(coordinate.branch.is_none());
    }

    #[test]
    fn test_full_config() {
        let ini = ini_from(
            "[repository]\n\
             owner = atomicptr\n\
             name = demo-storage\n\
             branch = master\n\
             prefix = site/public\n\
             [auth]\n\
             method = token\n\
             token = ghp_secret\n\
             [committer]\n\
             name = deploy-bot\n\
             email = deploy@example.com\n",
        );

        let config = parse_config(&ini).unwrap();
        assert_eq!(config.repository.branch.as_deref(), Some("master"));
        assert_eq!(config.prefix(), "site/public");
        assert!(matches!(config.credentials, Credentials::Token(ref t) if t == "ghp_secret"));
        assert_eq!(config.committer.email, "deploy@example.com");
    }

    #[test]
    fn test_missing_owner_is_an_error() {
        let ini = ini_from("[repository]\nname = demo-storage\n");

        let result = parse_config(&ini);
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { ref field, .. }) if field == "owner"
        ));
    }

    #[test]
    fn test_unknown_auth_method_fails_fast() {
        let ini = ini_from(
            "[repository]\n\
             owner = a\n\
             name = b\n\
             [auth]\n\
             method = kerberos\n",
        );

        let result = parse_config(&ini);
        assert!(matches!(
            result,
            Err(ConfigError::UnknownAuthMethod(ref m)) if m == "kerberos"
        ));
    }

    #[test]
    fn test_token_method_requires_token() {
        let ini = ini_from(
            "[repository]\n\
             owner = a\n\
             name = b\n\
             [auth]\n\
             method = token\n",
        );

        let result = parse_config(&ini);
        assert!(matches!(result, Err(ConfigError::MissingAuthField { .. })));
    }

    #[test]
    fn test_client_credentials_method() {
        let ini = ini_from(
            "[repository]\n\
             owner = a\n\
             name = b\n\
             [auth]\n\
             method = client-credentials\n\
             client_id = app-id\n\
             client_secret = app-secret\n",
        );

        let config = parse_config(&ini).unwrap();
        assert!(matches!(
            config.credentials,
            Credentials::ClientCredentials { .. }
        ));
    }

    #[test]
    fn test_overrides_apply_last() {
        let mut ini = ini_from(
            "[repository]\n\
             owner = atomicptr\n\
             name = demo-storage\n\
             branch = master\n",
        );

        apply_overrides(
            &mut ini,
            &[("repository.branch".to_string(), "dev".to_string())],
        )
        .unwrap();

        let config = parse_config(&ini).unwrap();
        assert_eq!(config.repository.branch.as_deref(), Some("dev"));
    }

    #[test]
    fn test_invalid_override_key() {
        let mut ini = Ini::new();
        let result = apply_overrides(&mut ini, &[("no-dot".to_string(), "x".to_string())]);
        assert!(matches!(result, Err(ConfigError::InvalidOverrideKey(_))));
    }
}
