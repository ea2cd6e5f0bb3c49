//! Runtime configuration, read from `config.yaml` in the data directory.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOGIN_DELAY_MS, DEFAULT_REMOTE_TIMEOUT_SECS, DEFAULT_REMOTE_URL,
    DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS,
};

/// How the library component is obtained
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteMode {
    /// Fetch the module manifest over HTTP
    #[default]
    Http,
    /// Use the catalog compiled into the shell (standalone development)
    Bundled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub mode: RemoteMode,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            mode: RemoteMode::Http,
            url: String::from(DEFAULT_REMOTE_URL),
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub login_delay_ms: u64,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Load `config.yaml` from `data_dir`, then apply environment overrides
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("MUSICDASH_REMOTE_URL") {
            if !url.trim().is_empty() {
                config.remote.url = url;
            }
        }

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let ttl = self.auth.token_ttl_hours;
        anyhow::ensure!(
            (1..=MAX_TOKEN_TTL_HOURS).contains(&ttl),
            "auth.token_ttl_hours must be between 1 and {}, got {}",
            MAX_TOKEN_TTL_HOURS,
            ttl
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
remote:
  mode: bundled
auth:
  login_delay_ms: 0
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.remote.mode, RemoteMode::Bundled);
        assert_eq!(config.remote.url, DEFAULT_REMOTE_URL);
        assert_eq!(config.auth.login_delay_ms, 0);
        assert_eq!(config.auth.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.auth, AuthConfig::default());
        assert_eq!(config.remote.mode, RemoteMode::Http);
    }

    #[test]
    fn test_token_ttl_out_of_range_is_an_error() {
        let err = Config::from_yaml("auth:\n  token_ttl_hours: 9000000000000").unwrap_err();
        assert!(err.to_string().contains("token_ttl_hours"));

        assert!(Config::from_yaml("auth:\n  token_ttl_hours: 0").is_err());
        assert!(Config::from_yaml("auth:\n  token_ttl_hours: -5").is_err());
        assert!(Config::from_yaml("auth:\n  token_ttl_hours: 168").is_ok());
    }

    #[test]
    fn test_out_of_range_ttl_in_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "auth:\n  token_ttl_hours: -1\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("remote: [1, 2").is_err());
    }
}
